use crate::structs::AnalysisOptions;
use async_trait::async_trait;
use exiftool::ExifTool;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Failure of the external metadata analyzer. A malformed or unsupported
/// image is a normal, reportable outcome; the cause text ends up in the
/// progress log verbatim.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("exiftool failed to process the image: {0}")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("failed to stage image bytes: {0}")]
    Staging(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Seam to the metadata extraction engine.
///
/// Input is the raw image byte sequence plus the run's options; output is a
/// flat JSON object of tag/value pairs in the analyzer's own order. The
/// engine must treat arbitrary bytes as a reportable failure, never a panic.
#[async_trait]
pub trait ImageAnalyzer: Send {
    async fn analyze(
        &mut self,
        image_data: &[u8],
        options: &AnalysisOptions,
    ) -> Result<Value, AnalyzerError>;
}

/// Production analyzer backed by the `exiftool` binary.
///
/// The session hands us bytes, not a path, so the bytes are staged to a
/// named temp file for the duration of the call. Numeric output (`-n`) is
/// requested so GPS and exposure fields arrive as plain numbers.
pub struct ExifToolAnalyzer {
    exiftool: ExifTool,
}

impl ExifToolAnalyzer {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            exiftool: ExifTool::new()?,
        })
    }

    pub fn with_executable(path: &Path) -> Result<Self, AnalyzerError> {
        Ok(Self {
            exiftool: ExifTool::with_executable(path)?,
        })
    }
}

/// Tags that describe the temp staging file rather than the image itself.
const STAGING_TAGS: &[&str] = &[
    "SourceFile",
    "FileName",
    "Directory",
    "FilePermissions",
    "FileModifyDate",
    "FileAccessDate",
    "FileInodeChangeDate",
];

fn strip_staging_tags(map: &mut Map<String, Value>) {
    for tag in STAGING_TAGS {
        map.remove(*tag);
    }
}

#[async_trait]
impl ImageAnalyzer for ExifToolAnalyzer {
    async fn analyze(
        &mut self,
        image_data: &[u8],
        options: &AnalysisOptions,
    ) -> Result<Value, AnalyzerError> {
        if !options.extract_metadata {
            return Ok(Value::Object(Map::new()));
        }

        let mut staged = tempfile::Builder::new()
            .prefix("forensics-")
            .suffix(".img")
            .tempfile()?;
        staged.write_all(image_data)?;
        staged.flush()?;

        let mut raw = self.exiftool.json(staged.path(), &["-n"])?;
        if let Some(map) = raw.as_object_mut() {
            strip_staging_tags(map);
        }
        Ok(raw)
    }
}
