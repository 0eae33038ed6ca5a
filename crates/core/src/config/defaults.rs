//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_TEMPLATE_ID: &str = "properties-search-template";
pub(crate) const DEFAULT_INFERENCE_ID: &str = ".elser-2-elasticsearch";
pub(crate) const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

pub(crate) fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

pub(crate) fn default_inference_id() -> String {
    DEFAULT_INFERENCE_ID.to_string()
}

pub(crate) fn default_probe_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}
