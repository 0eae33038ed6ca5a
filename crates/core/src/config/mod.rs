//! Configuration module for the propsearch system
//!
//! This module provides the connection and auth settings for the search
//! backend and the geocoding provider. Configuration can be loaded from a
//! TOML file and/or environment variables, and is validated before any
//! client is built from it.

mod defaults;
mod loading;

pub use loading::MAPS_API_KEY_ENV;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.propsearch/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".propsearch").join("config.toml"))
}

/// Main configuration structure for the propsearch system
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search backend base URL
    #[serde(default)]
    pub url: String,

    /// Backend API key (sent as `Authorization: ApiKey ...`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Backend basic-auth username, must be paired with `password`
    #[serde(default)]
    pub username: Option<String>,

    /// Backend basic-auth password, must be paired with `username`
    #[serde(default)]
    pub password: Option<String>,

    /// Path to a PEM encoded CA certificate trusted for the backend
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Google Maps API key used by the geocoding tool
    #[serde(default)]
    pub maps_api_key: Option<String>,

    /// Stored search template id
    #[serde(default = "default_template_id")]
    pub template_id: String,

    /// Inference endpoint probed for readiness at startup
    #[serde(default = "default_inference_id")]
    pub inference_id: String,

    /// Server-side timeout for the readiness probe, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.redacted_url())
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .field("ca_cert", &self.ca_cert)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "***REDACTED***"),
            )
            .field("template_id", &self.template_id)
            .field("inference_id", &self.inference_id)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .finish()
    }
}

/// Credentials presented to the search backend
#[derive(Clone, PartialEq, Eq)]
pub enum BackendAuth {
    /// No credentials
    None,
    /// `Authorization: ApiKey <key>`
    ApiKey(String),
    /// HTTP basic auth
    Basic { username: String, password: String },
}

impl std::fmt::Debug for BackendAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendAuth::None => f.write_str("None"),
            BackendAuth::ApiKey(_) => f.write_str("ApiKey(***REDACTED***)"),
            BackendAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***REDACTED***")
                .finish(),
        }
    }
}

/// Treats unset and blank values the same way
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            username: None,
            password: None,
            ca_cert: None,
            maps_api_key: None,
            template_id: default_template_id(),
            inference_id: default_inference_id(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl Config {
    /// Validates the configuration
    ///
    /// The url must be an absolute http(s) URL. `username` and `password`
    /// must be set together; `api_key` is independent, and no auth at all
    /// is valid.
    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(Error::validation(
                "url must be set (ES_URL or `url` in the config file)".to_string(),
            ));
        }
        let parsed = Url::parse(url)
            .map_err(|e| Error::validation(format!("url '{url}' is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "url '{url}' must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        match (present(&self.username), present(&self.password)) {
            (Some(_), None) => {
                return Err(Error::validation(
                    "password is required when username is set".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(Error::validation(
                    "username is required when password is set".to_string(),
                ));
            }
            _ => {}
        }

        if self.template_id.trim().is_empty() {
            return Err(Error::validation(
                "template_id must not be empty".to_string(),
            ));
        }
        if self.inference_id.trim().is_empty() {
            return Err(Error::validation(
                "inference_id must not be empty".to_string(),
            ));
        }
        if self.probe_timeout_secs == 0 {
            return Err(Error::validation(
                "probe_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Credentials to present to the backend. An api key wins over basic auth.
    pub fn auth(&self) -> BackendAuth {
        if let Some(key) = present(&self.api_key) {
            return BackendAuth::ApiKey(key.to_string());
        }
        match (present(&self.username), present(&self.password)) {
            (Some(username), Some(password)) => BackendAuth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => BackendAuth::None,
        }
    }

    /// The backend url with any embedded password removed, for logging
    pub fn redacted_url(&self) -> String {
        match Url::parse(self.url.trim()) {
            Ok(mut url) if url.password().is_some() => {
                if url.set_password(None).is_err() {
                    return "***REDACTED***".to_string();
                }
                url.to_string()
            }
            _ => self.url.clone(),
        }
    }

    /// The configured Google Maps key, if any
    pub fn maps_api_key(&self) -> Option<&str> {
        present(&self.maps_api_key)
    }
}
