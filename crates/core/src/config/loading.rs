//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

/// Environment variable holding the Google Maps API key
pub const MAPS_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `ES_`. For example:
    /// - `ES_URL=https://localhost:9200`
    /// - `ES_API_KEY=...`
    ///
    /// `GOOGLE_MAPS_API_KEY` sets the geocoding key.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_sources(Some(path), std::env::vars().collect())
    }

    /// Loads configuration from an optional file and an explicit environment map
    pub fn from_sources(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let builder = ConfigLib::builder();

        let builder = set_config_default(builder, "template_id", DEFAULT_TEMPLATE_ID)?;
        let builder = set_config_default(builder, "inference_id", DEFAULT_INFERENCE_ID)?;
        let mut builder = set_config_default(
            builder,
            "probe_timeout_secs",
            DEFAULT_PROBE_TIMEOUT_SECS as i64,
        )?;

        // Add the config file if it exists
        if let Some(path) = path {
            if path.exists() {
                debug!("Loading config file {}", path.display());
                builder = builder.add_source(File::from(path));
            } else {
                debug!("Config file {} not found, skipping", path.display());
            }
        }

        let maps_api_key = env
            .get(MAPS_API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .cloned();

        // Add environment variables with ES_ prefix
        builder = builder.add_source(
            Environment::with_prefix("ES")
                .prefix_separator("_")
                .source(Some(env)),
        );

        if let Some(key) = maps_api_key {
            builder = builder
                .set_override("maps_api_key", key)
                .map_err(|e| Error::config(format!("Failed to set {MAPS_API_KEY_ENV}: {e}")))?;
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.propsearch/config.toml or custom --config path)
    /// 3. Environment variables (ES_*, GOOGLE_MAPS_API_KEY)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
