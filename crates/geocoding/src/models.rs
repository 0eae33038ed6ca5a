//! Geocoding API response models

use propsearch_core::GeoPoint;
use serde::{Deserialize, Serialize};

/// Status the provider reports for a successful lookup
pub const STATUS_OK: &str = "OK";

/// Provider coordinates, as named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for GeoPoint {
    fn from(location: LatLng) -> Self {
        GeoPoint::new(location.lat, location.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

/// One candidate match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl GeocodeResult {
    /// A result located at the given coordinates
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            formatted_address: None,
            geometry: Some(Geometry {
                location: Some(LatLng { lat, lng }),
            }),
        }
    }

    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().and_then(|g| g.location)
    }
}

/// Geocoding API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    /// An `OK` response carrying the given results
    pub fn ok(results: Vec<GeocodeResult>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            error_message: None,
            results,
        }
    }

    /// Coordinates of the first result that has any
    pub fn first_location(&self) -> Option<LatLng> {
        self.results.iter().find_map(GeocodeResult::location)
    }
}
