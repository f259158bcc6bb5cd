use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Building-scale zoom used when the image carried exact GPS coordinates.
pub const CLOSE_UP_ZOOM: u8 = 15;
/// Regional zoom used for an IP-approximate location.
pub const REGIONAL_ZOOM: u8 = 6;
/// Country-scale zoom used for the fixed fallback point.
pub const COUNTRY_ZOOM: u8 = 4;

/// Fixed fallback center (geographic center of the contiguous US).
pub const DEFAULT_CENTER: (f64, f64) = (37.0902, -95.7129);

/// Approximate-location lookup failure. Always absorbed by
/// [`GeoResolver::resolve_center`]'s fallback, never surfaced to the session.
#[derive(Error, Debug)]
pub enum GeoLookupError {
    #[error("geolocation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geolocation service unavailable: {0}")]
    Unavailable(String),
}

/// Response of the approximate-location service. Coordinates are optional;
/// a response without both is treated the same as a failed lookup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApproxLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub country_name: Option<String>,
}

/// Seam to the IP-based geolocation collaborator.
#[async_trait]
pub trait ApproxLocator: Send {
    async fn locate(&self) -> Result<ApproxLocation, GeoLookupError>;
}

/// `ipapi.co` client. No authentication, no retry; a timeout counts as a
/// plain failure.
pub struct IpApiLocator {
    client: reqwest::Client,
    endpoint: String,
}

impl IpApiLocator {
    pub fn new() -> Self {
        Self::with_endpoint("https://ipapi.co/json/")
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for IpApiLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApproxLocator for IpApiLocator {
    async fn locate(&self) -> Result<ApproxLocation, GeoLookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Where a resolved map center came from. Drives narration and zoom.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum CenterSource {
    /// Coordinates extracted from the image itself.
    ExtractedGps,
    /// IP-approximate location, with whatever place names the service gave.
    Approximate {
        city: Option<String>,
        country: Option<String>,
    },
    /// The fixed fallback point.
    Default,
}

/// A map center the session can always act on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolvedCenter {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub source: CenterSource,
}

/// Decides the map center for a run.
///
/// Priority: exact GPS point at close-up zoom, else one approximate-location
/// attempt at regional zoom, else the fixed default at country zoom. The
/// fallback is unconditional; this resolution never fails and never retries
/// the network step.
pub struct GeoResolver {
    locator: Box<dyn ApproxLocator>,
}

impl GeoResolver {
    pub fn new(locator: Box<dyn ApproxLocator>) -> Self {
        Self { locator }
    }

    pub async fn resolve_center(&self, known_point: Option<(f64, f64)>) -> ResolvedCenter {
        if let Some((latitude, longitude)) = known_point {
            return ResolvedCenter {
                latitude,
                longitude,
                zoom: CLOSE_UP_ZOOM,
                source: CenterSource::ExtractedGps,
            };
        }

        match self.locator.locate().await {
            Ok(location) => {
                if let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude)
                {
                    ResolvedCenter {
                        latitude,
                        longitude,
                        zoom: REGIONAL_ZOOM,
                        source: CenterSource::Approximate {
                            city: location.city,
                            country: location.country_name,
                        },
                    }
                } else {
                    tracing::debug!("approximate location had no coordinates, using default");
                    Self::default_center()
                }
            }
            Err(err) => {
                tracing::debug!("approximate location lookup failed: {err}, using default");
                Self::default_center()
            }
        }
    }

    fn default_center() -> ResolvedCenter {
        ResolvedCenter {
            latitude: DEFAULT_CENTER.0,
            longitude: DEFAULT_CENTER.1,
            zoom: COUNTRY_ZOOM,
            source: CenterSource::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLocator(ApproxLocation);

    #[async_trait]
    impl ApproxLocator for FixedLocator {
        async fn locate(&self) -> Result<ApproxLocation, GeoLookupError> {
            Ok(self.0.clone())
        }
    }

    struct FailingLocator;

    #[async_trait]
    impl ApproxLocator for FailingLocator {
        async fn locate(&self) -> Result<ApproxLocation, GeoLookupError> {
            Err(GeoLookupError::Unavailable("timed out".into()))
        }
    }

    #[tokio::test]
    async fn test_known_point_wins_without_lookup() {
        // A failing locator proves the network step is skipped entirely.
        let resolver = GeoResolver::new(Box::new(FailingLocator));
        let center = resolver.resolve_center(Some((40.8208, 14.4228))).await;

        assert_eq!(center.latitude, 40.8208);
        assert_eq!(center.longitude, 14.4228);
        assert_eq!(center.zoom, CLOSE_UP_ZOOM);
        assert_eq!(center.source, CenterSource::ExtractedGps);
    }

    #[tokio::test]
    async fn test_approximate_location_used_at_regional_zoom() {
        let resolver = GeoResolver::new(Box::new(FixedLocator(ApproxLocation {
            latitude: Some(52.3791),
            longitude: Some(4.8994),
            city: Some("Amsterdam".into()),
            country_name: Some("Netherlands".into()),
        })));
        let center = resolver.resolve_center(None).await;

        assert_eq!(center.zoom, REGIONAL_ZOOM);
        assert_eq!(
            center.source,
            CenterSource::Approximate {
                city: Some("Amsterdam".into()),
                country: Some("Netherlands".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_default() {
        let resolver = GeoResolver::new(Box::new(FailingLocator));
        let center = resolver.resolve_center(None).await;

        assert_eq!(center.latitude, DEFAULT_CENTER.0);
        assert_eq!(center.longitude, DEFAULT_CENTER.1);
        assert_eq!(center.zoom, COUNTRY_ZOOM);
        assert_eq!(center.source, CenterSource::Default);
    }

    #[tokio::test]
    async fn test_response_without_coordinates_falls_back_to_default() {
        let resolver = GeoResolver::new(Box::new(FixedLocator(ApproxLocation {
            latitude: Some(52.3791),
            longitude: None,
            city: Some("Amsterdam".into()),
            country_name: None,
        })));
        let center = resolver.resolve_center(None).await;

        assert_eq!(center.source, CenterSource::Default);
        assert_eq!(center.zoom, COUNTRY_ZOOM);
    }
}
