//! Free-text location geocoding
//!
//! This crate turns a location typed by a user ("Surfside Beach, TX") into
//! coordinates. The HTTP provider sits behind the [`GeocodingProvider`]
//! trait; [`Geocoder`] applies the query rewrite policy for locations the
//! provider cannot resolve directly.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use async_trait::async_trait;
use propsearch_core::config::Config;
use propsearch_core::GeoPoint;
use std::sync::Arc;
use tracing::{debug, info};

pub mod error;
mod google;
mod models;

pub use error::{GeocodeError, Result};
pub use google::{GoogleMapsProvider, GOOGLE_GEOCODE_URL, REGION_COMPONENT};
pub use models::{GeocodeResponse, GeocodeResult, Geometry, LatLng, STATUS_OK};

/// Trait for geocoding providers
///
/// Implementations issue exactly one lookup per call and return the
/// provider's status and results without interpreting them.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<GeocodeResponse>;
}

/// Geocoder with the fallback query policy
#[derive(Clone)]
pub struct Geocoder {
    provider: Option<Arc<dyn GeocodingProvider>>,
}

impl std::fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geocoder")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl Geocoder {
    /// Create a geocoder; `None` leaves it unconfigured
    pub fn new(provider: Option<Arc<dyn GeocodingProvider>>) -> Self {
        Self { provider }
    }

    /// Build the Google Maps backed geocoder if a maps key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.maps_api_key() {
            Some(key) => {
                info!("Creating Google Maps geocoding provider");
                let provider = GoogleMapsProvider::new(key.to_string())?;
                Ok(Self::new(Some(Arc::new(provider))))
            }
            None => {
                info!("No Google Maps API key configured, geocoding disabled");
                Ok(Self::new(None))
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Geocode a free-text location
    ///
    /// 1. Query the provider with the text as given.
    /// 2. A status other than `OK` ends the chain with that status.
    /// 3. On an empty `OK` result, retry once with `TX` spelled out as
    ///    `Texas`, then once with only the text before the last comma.
    /// 4. The first result carrying coordinates wins; none is `NotFound`.
    pub async fn geocode(&self, location: &str) -> Result<GeoPoint> {
        let provider = self
            .provider
            .as_deref()
            .ok_or(GeocodeError::NotConfigured)?;

        let location = location.trim();
        if location.is_empty() {
            return Err(GeocodeError::EmptyLocation);
        }

        let mut response = attempt(provider, location).await?;

        if response.results.is_empty() && location.contains("TX") {
            let expanded = location.replace("TX", "Texas");
            info!("No results for '{location}', retrying as '{expanded}'");
            response = attempt(provider, &expanded).await?;
        }

        if response.results.is_empty() {
            if let Some((head, _)) = location.rsplit_once(',') {
                let head = head.trim();
                if !head.is_empty() {
                    info!("No results for '{location}', retrying as '{head}'");
                    response = attempt(provider, head).await?;
                }
            }
        }

        response
            .first_location()
            .map(GeoPoint::from)
            .ok_or_else(|| GeocodeError::NotFound(location.to_string()))
    }
}

/// One provider lookup with the status check applied
async fn attempt(provider: &dyn GeocodingProvider, address: &str) -> Result<GeocodeResponse> {
    let response = provider.lookup(address).await?;
    debug!(
        "Geocoding '{address}': status {} with {} results",
        response.status,
        response.results.len()
    );

    if response.status != STATUS_OK {
        return Err(GeocodeError::Provider {
            status: response.status,
            message: response
                .error_message
                .unwrap_or_else(|| "no error message provided".to_string()),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Provider answering from a fixed address table and recording queries
    struct ScriptedProvider {
        answers: HashMap<String, GeocodeResponse>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(answers: Vec<(&str, GeocodeResponse)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeocodingProvider for ScriptedProvider {
        async fn lookup(&self, address: &str) -> Result<GeocodeResponse> {
            self.queries.lock().unwrap().push(address.to_string());
            Ok(self
                .answers
                .get(address)
                .cloned()
                .unwrap_or_else(|| GeocodeResponse::ok(Vec::new())))
        }
    }

    fn found(lat: f64, lng: f64) -> GeocodeResponse {
        GeocodeResponse::ok(vec![GeocodeResult::at(lat, lng)])
    }

    fn geocoder(provider: &Arc<ScriptedProvider>) -> Geocoder {
        Geocoder::new(Some(provider.clone() as Arc<dyn GeocodingProvider>))
    }

    #[tokio::test]
    async fn test_direct_match_renames_fields() {
        let provider = Arc::new(ScriptedProvider::new(vec![(
            "Houston, Texas",
            found(29.1, -95.1),
        )]));
        let point = geocoder(&provider).geocode("Houston, Texas").await.unwrap();
        assert_eq!(point, GeoPoint::new(29.1, -95.1));
        assert_eq!(provider.queries(), vec!["Houston, Texas"]);
    }

    #[tokio::test]
    async fn test_tx_expanded_to_texas() {
        let provider = Arc::new(ScriptedProvider::new(vec![(
            "Surfside Beach, Texas",
            found(28.94, -95.29),
        )]));
        let point = geocoder(&provider)
            .geocode("Surfside Beach, TX")
            .await
            .unwrap();
        assert_eq!(point, GeoPoint::new(28.94, -95.29));
        assert_eq!(
            provider.queries(),
            vec!["Surfside Beach, TX", "Surfside Beach, Texas"]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_text_before_last_comma() {
        let provider = Arc::new(ScriptedProvider::new(vec![(
            "Surfside Beach",
            found(28.94, -95.29),
        )]));
        let point = geocoder(&provider)
            .geocode("Surfside Beach, TX")
            .await
            .unwrap();
        assert_eq!(point, GeoPoint::new(28.94, -95.29));
        assert_eq!(
            provider.queries(),
            vec!["Surfside Beach, TX", "Surfside Beach, Texas", "Surfside Beach"]
        );
    }

    #[tokio::test]
    async fn test_comma_fallback_without_tx() {
        let provider = Arc::new(ScriptedProvider::new(vec![(
            "Galveston, Gulf Coast",
            found(29.3, -94.8),
        )]));
        let point = geocoder(&provider)
            .geocode("Galveston, Gulf Coast, 77550")
            .await
            .unwrap();
        assert_eq!(point, GeoPoint::new(29.3, -94.8));
        assert_eq!(
            provider.queries(),
            vec!["Galveston, Gulf Coast, 77550", "Galveston, Gulf Coast"]
        );
    }

    #[tokio::test]
    async fn test_not_found_names_original_input() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let err = geocoder(&provider)
            .geocode("Nowhere, TX")
            .await
            .unwrap_err();
        assert!(matches!(&err, GeocodeError::NotFound(loc) if loc == "Nowhere, TX"));
        assert_eq!(provider.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_no_comma_no_tx_single_attempt() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let err = geocoder(&provider).geocode("Atlantis").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(_)));
        assert_eq!(provider.queries(), vec!["Atlantis"]);
    }

    #[tokio::test]
    async fn test_non_ok_status_is_provider_error() {
        let denied = GeocodeResponse {
            status: "REQUEST_DENIED".to_string(),
            error_message: Some("The provided API key is invalid.".to_string()),
            results: Vec::new(),
        };
        let provider = Arc::new(ScriptedProvider::new(vec![("Austin, TX", denied)]));
        let err = geocoder(&provider).geocode("Austin, TX").await.unwrap_err();
        match err {
            GeocodeError::Provider { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(provider.queries(), vec!["Austin, TX"]);
    }

    #[tokio::test]
    async fn test_non_ok_status_on_retry_ends_chain() {
        let over_limit = GeocodeResponse {
            status: "OVER_QUERY_LIMIT".to_string(),
            error_message: Some("You have exceeded your daily request quota.".to_string()),
            results: Vec::new(),
        };
        let provider = Arc::new(ScriptedProvider::new(vec![
            ("Nowhere, TX", GeocodeResponse::ok(Vec::new())),
            ("Nowhere, Texas", over_limit),
        ]));

        let err = geocoder(&provider).geocode("Nowhere, TX").await.unwrap_err();

        assert!(matches!(
            &err,
            GeocodeError::Provider { status, .. } if status == "OVER_QUERY_LIMIT"
        ));
        assert_eq!(provider.queries(), vec!["Nowhere, TX", "Nowhere, Texas"]);
    }

    #[tokio::test]
    async fn test_results_without_geometry_are_not_found() {
        let no_geometry = GeocodeResponse::ok(vec![GeocodeResult {
            formatted_address: Some("Somewhere".to_string()),
            geometry: None,
        }]);
        let provider = Arc::new(ScriptedProvider::new(vec![("Somewhere", no_geometry)]));
        let err = geocoder(&provider).geocode("Somewhere").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_geocoder() {
        let err = Geocoder::new(None).geocode("Austin, TX").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NotConfigured));
    }

    #[tokio::test]
    async fn test_empty_location_rejected() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let err = geocoder(&provider).geocode("   ").await.unwrap_err();
        assert!(matches!(err, GeocodeError::EmptyLocation));
        assert!(provider.queries().is_empty());
    }

    #[test]
    fn test_from_config_without_key_is_unconfigured() {
        let config = Config {
            url: "http://localhost:9200".to_string(),
            ..Config::default()
        };
        assert!(!Geocoder::from_config(&config).unwrap().is_configured());

        let with_key = Config {
            maps_api_key: Some("key".to_string()),
            ..config
        };
        assert!(Geocoder::from_config(&with_key).unwrap().is_configured());
    }
}
