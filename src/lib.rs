//! # Image Forensics
//!
//! Orchestration and reporting layer for digital-image forensic analysis.
//!
//! An external analyzer extracts raw metadata from an image's binary
//! content; this crate drives that analysis, normalizes and validates the
//! output, narrates progress in an ordered event log, resolves a map
//! center, and produces durable export artifacts.
//!
//! ## Key Features
//!
//! - **Analysis sessions**: a state machine from "image bytes ready"
//!   through analysis to a rendered report, with retry after failure.
//! - **Canonical metadata**: heterogeneous, partially-present camera and
//!   GPS fields normalized into one presence-tracked record.
//! - **Geolocation resolution**: extracted GPS when present and valid,
//!   IP-approximate location as a fallback, a fixed default as the last
//!   resort. Never fails.
//! - **Three report views**: sectioned on-screen markup, CSV, and plain
//!   text, all driven by one field-descriptor table so they cannot drift.
//! - **Progress log**: append-only, timestamped narration with severities.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use image_forensics::analyzer::ExifToolAnalyzer;
//! use image_forensics::geo::IpApiLocator;
//! use image_forensics::map::TracingMap;
//! use image_forensics::report::ExportFormat;
//! use image_forensics::session::AnalysisSession;
//! use image_forensics::structs::AnalysisOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = AnalysisSession::builder()
//!         .analyzer(Box::new(ExifToolAnalyzer::new()?))
//!         .locator(Box::new(IpApiLocator::new()))
//!         .map(Box::new(TracingMap))
//!         .build();
//!
//!     session.load_image(std::fs::read("photo.jpg")?)?;
//!     session.start_analysis(AnalysisOptions {
//!         extract_metadata: true,
//!         reverse_image_search: false,
//!         plot_coordinates: true,
//!     })
//!     .await?;
//!
//!     let report = session.export(ExportFormat::Txt)?;
//!     println!("{}", report.content);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod error;
pub mod geo;
pub mod map;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod session;
pub mod structs;

pub use error::ForensicsError;
pub use session::{AnalysisSession, SessionState};
pub use structs::{AnalysisOptions, MetadataField, MetadataRecord};
