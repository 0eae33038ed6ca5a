//! Core types and traits for the propsearch property search tools
//!
//! This crate provides the foundational abstractions used throughout the
//! propsearch system, including:
//!
//! - **Configuration**: connection and auth settings, loading and validation
//! - **Search parameters**: typed template parameters and their normalization
//! - **Templates**: placeholder extraction from stored search templates
//! - **Search API**: the backend capability trait and its wire models
//! - **Error handling**: Unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod geo;
pub mod search_api;
pub mod search_models;
pub mod search_params;
pub mod template;

// Re-export main types for convenience
pub use config::{BackendAuth, Config};
pub use error::{Error, Result, ResultExt};
pub use geo::GeoPoint;
pub use search_api::SearchBackend;
pub use search_models::{SearchHit, SearchResponse, StoredTemplate, TotalHits};
pub use search_params::{ParamValue, SearchParams};
pub use template::{extract_template_parameters, PARAMETER_GLOSSARY};

