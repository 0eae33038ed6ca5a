//! MCP Server for property search
//!
//! Provides a Model Context Protocol server exposing three tools over stdio:
//! `get_properties_template_params`, `geocode_location` and `search_template`.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod error;
mod output_formatter;
mod search_executor;
mod server;
mod template_introspection;
mod tool;

pub use error::{McpError, Result};
pub use output_formatter::{format_hit, format_metadata, FormattedSearchResult};
pub use search_executor::{SearchExecutor, PROPERTIES_INDEX};
pub use server::{run_mcp_server, PropertiesMcpServer};
pub use template_introspection::{get_template_parameters, TemplateParameters};

#[cfg(test)]
mod test_support;
