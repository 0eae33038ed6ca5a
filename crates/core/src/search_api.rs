//! Search backend trait definition
//!
//! This trait defines the capabilities the tools consume from the search
//! backend. The HTTP implementation lives in the elasticsearch crate; tests
//! substitute in-process fakes.

use crate::error::Result;
use crate::search_params::SearchParams;
use async_trait::async_trait;

pub use super::search_models::*;

/// Trait defining search backend operations
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a stored search template against an index
    async fn search_template(
        &self,
        index: &str,
        template_id: &str,
        params: &SearchParams,
    ) -> Result<SearchResponse>;

    /// Fetch the source of a stored template
    ///
    /// Returns `Error::NotFound` when no template with this id exists.
    async fn get_stored_template(&self, template_id: &str) -> Result<StoredTemplate>;

    /// Run one inference request against a hosted inference endpoint
    ///
    /// `timeout_secs` is passed to the backend as the server-side timeout.
    async fn run_inference(&self, inference_id: &str, input: &str, timeout_secs: u64)
        -> Result<()>;
}
