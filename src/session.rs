use crate::analyzer::ImageAnalyzer;
use crate::error::ForensicsError;
use crate::geo::{ApproxLocator, CenterSource, GeoResolver};
use crate::map::MapView;
use crate::normalize::normalize;
use crate::progress::ProgressLog;
use crate::report::{self, ExportArtifact, ExportFormat};
use crate::structs::{AnalysisOptions, MetadataRecord};
use bon::bon;
use serde::{Deserialize, Serialize};

/// Lifecycle of one analysis session.
///
/// `ReportReady` and `Failed` are terminal: nothing moves the session out
/// of them without new operator input, but both are re-enterable by
/// starting another analysis on the retained image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionState {
    Idle,
    ImageLoaded,
    Analyzing,
    ReportReady,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::ReportReady | SessionState::Failed)
    }

    fn accepts_load_image(self) -> bool {
        matches!(self, SessionState::Idle) || self.is_terminal()
    }

    fn accepts_start_analysis(self) -> bool {
        matches!(self, SessionState::ImageLoaded) || self.is_terminal()
    }
}

/// The analysis session: drives the pipeline from "image bytes ready"
/// through the analyzer to a rendered, exportable report.
///
/// Exactly one analysis is in flight at a time; the held record and
/// progress log belong to the current run and are discarded wholesale when
/// a new one starts. Collaborators (analyzer, geolocation, map widget) are
/// injected behind their seams.
pub struct AnalysisSession {
    state: SessionState,
    image_bytes: Option<Vec<u8>>,
    record: Option<MetadataRecord>,
    log: ProgressLog,
    analyzer: Box<dyn ImageAnalyzer>,
    geo: GeoResolver,
    map: Box<dyn MapView>,
}

#[bon]
impl AnalysisSession {
    /// Constructs a session via a builder pattern.
    ///
    /// # Builder Arguments
    ///
    /// * `analyzer` - The metadata extraction engine.
    /// * `locator` - The approximate-location collaborator used when the
    ///   image carries no GPS data.
    /// * `map` - The map widget the session centers and drops markers on.
    #[builder]
    pub fn new(
        analyzer: Box<dyn ImageAnalyzer>,
        locator: Box<dyn ApproxLocator>,
        map: Box<dyn MapView>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            image_bytes: None,
            record: None,
            log: ProgressLog::new(),
            analyzer,
            geo: GeoResolver::new(locator),
            map,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.log
    }

    pub fn record(&self) -> Option<&MetadataRecord> {
        self.record.as_ref()
    }

    /// The currently held image bytes. Retained through `Failed` so the
    /// operator can retry without re-uploading.
    pub fn image_bytes(&self) -> Option<&[u8]> {
        self.image_bytes.as_deref()
    }

    /// Narrates a rejected operation. The log of an in-flight analysis is
    /// never touched: its entries belong to that run alone.
    fn reject(&mut self, cause: &str) {
        tracing::warn!("rejected: {cause}");
        if self.state != SessionState::Analyzing {
            self.log.error(cause);
        }
    }

    /// Loads image bytes into the session.
    ///
    /// Valid from `Idle` or a terminal state; any held record is released.
    /// Empty input is rejected without touching session state.
    pub fn load_image(&mut self, bytes: Vec<u8>) -> Result<(), ForensicsError> {
        if !self.state.accepts_load_image() {
            self.reject("Cannot load a new image right now");
            return Err(ForensicsError::InvalidState {
                operation: "load_image",
                state: self.state,
            });
        }
        if bytes.is_empty() {
            self.reject("No image data provided");
            return Err(ForensicsError::EmptyInput);
        }

        tracing::info!(size_bytes = bytes.len(), "image loaded");
        self.record = None;
        self.image_bytes = Some(bytes);
        self.state = SessionState::ImageLoaded;
        Ok(())
    }

    /// Releases the image, record and log, returning the session to `Idle`.
    pub fn remove_image(&mut self) -> Result<(), ForensicsError> {
        if self.state == SessionState::Analyzing {
            self.reject("Cannot remove the image during analysis");
            return Err(ForensicsError::InvalidState {
                operation: "remove_image",
                state: self.state,
            });
        }
        self.image_bytes = None;
        self.record = None;
        self.log.clear();
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Runs one analysis over the held image bytes.
    ///
    /// The previous run's record and progress log are discarded in full.
    /// Narration order is a contract consumed by the on-screen log, not
    /// cosmetics: starting, loading, extracting (when requested), then the
    /// per-stage outcomes. On analyzer failure the session lands in
    /// `Failed` with the cause narrated at error severity and the image
    /// bytes still held for a retry.
    pub async fn start_analysis(&mut self, options: AnalysisOptions) -> Result<(), ForensicsError> {
        if !self.state.accepts_start_analysis() {
            self.reject("Analysis cannot start from the current state");
            return Err(ForensicsError::InvalidState {
                operation: "start_analysis",
                state: self.state,
            });
        }
        if self.image_bytes.is_none() {
            self.reject("No image data provided");
            return Err(ForensicsError::EmptyInput);
        }
        let Some(image) = self.image_bytes.as_deref() else {
            return Err(ForensicsError::EmptyInput);
        };

        self.record = None;
        self.log.clear();
        self.state = SessionState::Analyzing;

        self.log.info("Starting image analysis...");
        self.log.info("Loading image data...");
        if options.extract_metadata {
            self.log.info("Extracting metadata from image...");
        }

        let raw = match self.analyzer.analyze(image, &options).await {
            Ok(raw) => raw,
            Err(err) => {
                self.log.error(format!("Error during analysis: {err}"));
                self.state = SessionState::Failed;
                return Err(ForensicsError::Analyzer(err));
            }
        };
        self.log.success("Metadata extraction completed");
        let record = normalize(&raw);

        if options.extract_metadata {
            self.log.info("Processing metadata fields...");
            if let Some((latitude, longitude)) = record.gps_point() {
                self.log
                    .success(format!("Found GPS coordinates: {latitude}, {longitude}"));
                let center = self.geo.resolve_center(Some((latitude, longitude))).await;
                self.map.set_view(center.latitude, center.longitude, center.zoom);
                if options.plot_coordinates {
                    self.map.place_marker(latitude, longitude);
                }
            } else {
                self.log.warning("No GPS coordinates found in metadata");
                self.log.info("Centering map on default location...");
                let center = self.geo.resolve_center(None).await;
                self.map.set_view(center.latitude, center.longitude, center.zoom);
                if let CenterSource::Approximate { city, country } = &center.source {
                    self.log.info(format!(
                        "Centered map on approximate location: {}, {}",
                        city.as_deref().unwrap_or("Unknown"),
                        country.as_deref().unwrap_or("Unknown")
                    ));
                }
            }
        }

        if options.reverse_image_search {
            self.log.warning("Reverse image search not yet implemented");
        }

        self.record = Some(record);
        self.state = SessionState::ReportReady;
        self.log.success("Analysis complete!");
        Ok(())
    }

    /// Renders a downloadable artifact from the held record.
    pub fn export(&mut self, format: ExportFormat) -> Result<ExportArtifact, ForensicsError> {
        if self.record.is_none() {
            self.reject("No results to export");
            return Err(ForensicsError::ExportWithNoResult);
        }
        let record = self
            .record
            .as_ref()
            .ok_or(ForensicsError::ExportWithNoResult)?;
        Ok(report::render_export(record, format)?)
    }
}
