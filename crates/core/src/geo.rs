//! Geographic point shared by the geocoder and the search tools

use serde::{Deserialize, Serialize};

/// A geocoded location. Downstream consumers only ever see these field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "latitude: {}, longitude: {}",
            self.latitude, self.longitude
        )
    }
}
