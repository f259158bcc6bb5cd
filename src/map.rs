/// Seam to the interactive map widget.
///
/// The widget itself (tile rendering, projections) lives outside this
/// crate; the session only needs to center the view and drop a marker.
/// Placing a new marker replaces any previous one, so at most one marker
/// exists at a time.
pub trait MapView: Send {
    fn set_view(&mut self, latitude: f64, longitude: f64, zoom: u8);
    fn place_marker(&mut self, latitude: f64, longitude: f64);
}

/// Headless map used by the CLI: narrates map operations to the tracing
/// log instead of drawing anything.
#[derive(Debug, Default)]
pub struct TracingMap;

impl MapView for TracingMap {
    fn set_view(&mut self, latitude: f64, longitude: f64, zoom: u8) {
        tracing::info!(latitude, longitude, zoom, "map view centered");
    }

    fn place_marker(&mut self, latitude: f64, longitude: f64) {
        tracing::info!(latitude, longitude, "map marker placed");
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::MapView;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    pub enum MapCall {
        SetView { latitude: f64, longitude: f64, zoom: u8 },
        PlaceMarker { latitude: f64, longitude: f64 },
    }

    /// Test double that records every widget call for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingMap {
        calls: Arc<Mutex<Vec<MapCall>>>,
    }

    impl RecordingMap {
        pub fn new() -> (Self, Arc<Mutex<Vec<MapCall>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl MapView for RecordingMap {
        fn set_view(&mut self, latitude: f64, longitude: f64, zoom: u8) {
            self.calls.lock().unwrap().push(MapCall::SetView {
                latitude,
                longitude,
                zoom,
            });
        }

        fn place_marker(&mut self, latitude: f64, longitude: f64) {
            self.calls.lock().unwrap().push(MapCall::PlaceMarker {
                latitude,
                longitude,
            });
        }
    }
}
