use crate::session::SessionState;
use thiserror::Error;

/// The primary error type for the image-forensics crate.
#[derive(Error, Debug)]
pub enum ForensicsError {
    #[error("no image data was provided")]
    EmptyInput,

    #[error("{operation} is not valid while the session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("analysis failed: {0}")]
    Analyzer(#[from] crate::analyzer::AnalyzerError),

    #[error("no analysis result is available to export")]
    ExportWithNoResult,

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
