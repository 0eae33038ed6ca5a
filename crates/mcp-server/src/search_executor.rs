//! Templated search execution

use crate::error::{McpError, Result};
use crate::output_formatter::FormattedSearchResult;
use propsearch_core::{SearchBackend, SearchParams};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The only index the search tool queries
pub const PROPERTIES_INDEX: &str = "properties";

/// Runs the properties search template with normalized parameters
#[derive(Clone)]
pub struct SearchExecutor {
    backend: Arc<dyn SearchBackend>,
    template_id: String,
}

impl std::fmt::Debug for SearchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchExecutor")
            .field("backend", &"<SearchBackend>")
            .field("template_id", &self.template_id)
            .finish()
    }
}

impl SearchExecutor {
    pub fn new(backend: Arc<dyn SearchBackend>, template_id: impl Into<String>) -> Self {
        Self {
            backend,
            template_id: template_id.into(),
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Normalize `params`, execute the search and format the hits
    ///
    /// The requested `index` and `template_id` are not used for routing: the
    /// search always runs against [`PROPERTIES_INDEX`] with the configured
    /// template.
    pub async fn run_search(
        &self,
        index: &str,
        template_id: &str,
        params: &SearchParams,
        original_query: &str,
    ) -> Result<FormattedSearchResult> {
        if index != PROPERTIES_INDEX || template_id != self.template_id {
            debug!(
                "Ignoring requested index '{index}' / template '{template_id}', using '{PROPERTIES_INDEX}' / '{}'",
                self.template_id
            );
        }

        let normalized = params.normalized(original_query);
        debug!("Normalized search params: {:?}", normalized);

        let response = self
            .backend
            .search_template(PROPERTIES_INDEX, &self.template_id, &normalized)
            .await
            .map_err(|e| {
                warn!("Search template execution failed: {e}");
                McpError::Search(e.to_string())
            })?;

        let formatted = FormattedSearchResult::from_response(&response, normalized.offset());
        info!(
            "Search returned {} of {} results",
            formatted.hits.len(),
            response.total()
        );
        Ok(formatted)
    }
}
