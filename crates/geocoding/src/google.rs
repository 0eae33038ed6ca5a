//! Google Maps Geocoding API provider

use crate::error::{GeocodeError, Result};
use crate::models::GeocodeResponse;
use crate::GeocodingProvider;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Lookups are restricted to this country
pub const REGION_COMPONENT: &str = "country:US";

/// Google Maps geocoding provider
pub struct GoogleMapsProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleMapsProvider {
    /// Create a new Google Maps provider
    ///
    /// # Arguments
    /// * `api_key` - Google Maps API key with the Geocoding API enabled
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GeocodeError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: GOOGLE_GEOCODE_URL.to_string(),
        })
    }

    /// Point the provider at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        info!("Geocoding endpoint overridden: {}", self.endpoint);
        self
    }
}

#[async_trait]
impl GeocodingProvider for GoogleMapsProvider {
    async fn lookup(&self, address: &str) -> Result<GeocodeResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("address", address),
                ("components", REGION_COMPONENT),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            // The request URL carries the API key
            .map_err(|e| GeocodeError::Http(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!("Geocoding API error {status}: {error_text}");
            return Err(GeocodeError::Http(format!(
                "Geocoding API returned {status}: {error_text}"
            )));
        }

        response.json::<GeocodeResponse>().await.map_err(|e| {
            GeocodeError::Http(format!(
                "Failed to parse geocoding response: {}",
                e.without_url()
            ))
        })
    }
}
