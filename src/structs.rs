use serde::{Deserialize, Serialize};

/// Options selected by the operator before a run. Immutable once the run starts.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct AnalysisOptions {
    pub extract_metadata: bool,
    pub reverse_image_search: bool,
    pub plot_coordinates: bool,
}

/// One raw tag/value pair as the analyzer reported it.
///
/// Duplicates are allowed and order is meaningful: it reflects the tag
/// ordering in the image's binary container, which the report reproduces
/// for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetadataField {
    pub tag: String,
    pub value: String,
}

/// The canonical, presence-tracked result of one analysis run.
///
/// Every field is `Option` so that "absent" and "zero" stay distinct: an
/// altitude of exactly `0.0` or an ISO of `0` is present data, not a
/// missing field. Invariants enforced by [`crate::normalize::normalize`]:
/// `gps_latitude`/`gps_longitude` are both present or both absent, and so
/// are `width`/`height`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MetadataRecord {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub date_taken: Option<String>,
    pub software: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub orientation: Option<u64>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub gps_altitude: Option<f64>,
    pub iso: Option<u64>,
    pub exposure_time: Option<f64>,
    pub f_number: Option<f64>,
    pub focal_length: Option<f64>,
    pub all_fields: Vec<MetadataField>,
}

impl MetadataRecord {
    /// The extracted GPS point, if the pairing invariant holds.
    pub fn gps_point(&self) -> Option<(f64, f64)> {
        self.gps_latitude.zip(self.gps_longitude)
    }
}
