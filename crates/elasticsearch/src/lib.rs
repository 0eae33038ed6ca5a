//! Search backend adapter for Elasticsearch
//!
//! This crate provides the HTTP client the tools use to execute stored
//! search templates, fetch template sources and probe inference endpoints,
//! plus the startup readiness probe built on top of it.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use propsearch_core::config::Config;
use propsearch_core::error::Result;
use propsearch_core::SearchBackend;
use std::sync::Arc;
use tracing::info;

mod client;
mod readiness;

pub use client::ElasticsearchClient;
pub use readiness::{check_endpoint, spawn_readiness_probe, PROBE_INPUT};

/// Create the search backend described by the configuration
///
/// The configuration is expected to have passed `Config::validate`.
pub fn create_search_backend(config: &Config) -> Result<Arc<dyn SearchBackend>> {
    info!("Creating Elasticsearch backend for {}", config.redacted_url());
    let client = ElasticsearchClient::new(config)?;
    Ok(Arc::new(client))
}
