//! Text formatting for search tool responses
//!
//! A search response becomes one metadata fragment followed by one text
//! fragment per hit. Highlighted fields are shown with their highlights;
//! every other source field is shown as JSON, in the order the backend
//! returned them.

use propsearch_core::{SearchHit, SearchResponse};
use rmcp::model::Content;

/// Formatted search response for MCP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSearchResult {
    pub metadata: String,
    pub hits: Vec<String>,
}

impl FormattedSearchResult {
    /// Format a backend response; `offset` is the zero-based `from` of the request
    pub fn from_response(response: &SearchResponse, offset: u64) -> Self {
        Self {
            metadata: format_metadata(response.total(), response.hits.hits.len(), offset),
            hits: response.hits.hits.iter().map(format_hit).collect(),
        }
    }

    /// Metadata first, then hits in backend order
    pub fn into_contents(self) -> Vec<Content> {
        std::iter::once(self.metadata)
            .chain(self.hits)
            .map(Content::text)
            .collect()
    }
}

pub fn format_metadata(total: u64, returned: usize, offset: u64) -> String {
    format!("Total results: {total}, showing {returned} from position {offset}")
}

pub fn format_hit(hit: &SearchHit) -> String {
    let mut lines = Vec::new();

    for (field, fragments) in &hit.highlight {
        let highlights: Vec<&str> = fragments
            .iter()
            .map(String::as_str)
            .filter(|f| !f.trim().is_empty())
            .collect();
        if !highlights.is_empty() {
            lines.push(format!("{field} (highlighted): {}", highlights.join(" ... ")));
        }
    }

    for (field, value) in &hit.source {
        if hit.highlight.contains_key(field) {
            continue;
        }
        lines.push(format!("{field}: {value}"));
    }

    lines.join("\n").trim().to_string()
}
