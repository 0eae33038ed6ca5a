//! Error types for the MCP server

use propsearch_geocoding::GeocodeError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur in the MCP server
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template unavailable: {0}")]
    Template(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error(transparent)]
    Geocoding(#[from] GeocodeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("MCP transport error: {0}")]
    Transport(String),
}

impl McpError {
    /// Convert to MCP tool error text (isError: true response)
    pub fn to_tool_error_message(&self) -> String {
        match self {
            McpError::InvalidInput(msg) => format!("Error: Invalid input: {msg}"),
            McpError::Template(msg) => format!(
                "Error: Could not read search template: {msg}\n\n\
                Hint: Make sure the properties search template has been stored in the cluster."
            ),
            McpError::Search(msg) => format!("Error: Search failed: {msg}"),
            McpError::Geocoding(e) => format!("Error: {e}"),
            McpError::Serialization(e) => format!("Error: Failed to format results: {e}"),
            McpError::Transport(msg) => format!("Error: Transport error: {msg}"),
        }
    }
}
