//! Error types for geocoding

use thiserror::Error;

/// Result type alias for geocoding operations
pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Errors that can occur while geocoding a location
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Google Maps API key is not configured. Set GOOGLE_MAPS_API_KEY to enable geocoding.")]
    NotConfigured,

    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Geocoding failed with status {status}: {message}")]
    Provider { status: String, message: String },

    #[error("Could not find coordinates for location: {0}")]
    NotFound(String),

    #[error("Geocoding request failed: {0}")]
    Http(String),
}
