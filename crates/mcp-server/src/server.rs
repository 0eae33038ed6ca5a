//! MCP Server implementation for property search
//!
//! Implements the MCP server with the template discovery, geocoding and
//! search tools using rmcp SDK with stdio transport. Every tool reports
//! failures as an `isError` tool result, never as a protocol error, so one
//! failed backend call does not affect later calls.

use crate::error::McpError;
use crate::search_executor::SearchExecutor;
use crate::template_introspection::get_template_parameters;
use crate::tool::{GeocodeLocationInput, SearchTemplateInput};
use propsearch_core::{SearchBackend, SearchParams};
use propsearch_geocoding::Geocoder;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities,
        ServerInfo,
    },
    tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// MCP Server for property search
#[derive(Clone)]
pub struct PropertiesMcpServer {
    tool_router: ToolRouter<Self>,
    backend: Arc<dyn SearchBackend>,
    executor: SearchExecutor,
    geocoder: Geocoder,
}

impl std::fmt::Debug for PropertiesMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertiesMcpServer")
            .field("backend", &"<SearchBackend>")
            .field("executor", &self.executor)
            .field("geocoder", &self.geocoder)
            .finish()
    }
}

impl PropertiesMcpServer {
    /// Create a new MCP server instance
    pub fn new(backend: Arc<dyn SearchBackend>, geocoder: Geocoder, template_id: String) -> Self {
        Self {
            tool_router: Self::tool_router(),
            executor: SearchExecutor::new(backend.clone(), template_id),
            backend,
            geocoder,
        }
    }
}

/// Wrap an error as tool output
fn tool_error(err: &McpError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(err.to_tool_error_message())])
}

/// Text fragments for the caller plus a structured payload for machine consumers
fn with_structured(contents: Vec<Content>, payload: serde_json::Value) -> CallToolResult {
    let mut result = CallToolResult::success(contents);
    result.structured_content = Some(payload);
    result
}

#[tool_router]
impl PropertiesMcpServer {
    /// List the parameters the properties search template expects.
    #[tool(
        name = "get_properties_template_params",
        description = "Get the parameters of the properties search template. Call this first to learn which parameters search_template accepts, together with a description of the common ones."
    )]
    async fn get_properties_template_params(&self) -> Result<CallToolResult, ErrorData> {
        let template_id = self.executor.template_id();
        info!("Executing get_properties_template_params: template={template_id}");

        match get_template_parameters(self.backend.as_ref(), template_id).await {
            Ok(parameters) => Ok(with_structured(
                vec![
                    Content::text(parameters.summary()),
                    Content::text(parameters.descriptions),
                ],
                json!({ "parameters": parameters.names_list() }),
            )),
            Err(e) => Ok(tool_error(&e)),
        }
    }

    /// Geocode a free-text location into latitude and longitude.
    #[tool(
        name = "geocode_location",
        description = "Convert a location (city, address, or place name) into latitude and longitude coordinates for use as search_template parameters."
    )]
    async fn geocode_location(
        &self,
        Parameters(input): Parameters<GeocodeLocationInput>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("Executing geocode_location: location={}", input.location);

        if input.location.trim().is_empty() {
            return Ok(tool_error(&McpError::InvalidInput(
                "location must not be empty".to_string(),
            )));
        }

        let point = match self.geocoder.geocode(&input.location).await {
            Ok(point) => point,
            Err(e) => {
                warn!("geocode_location failed: {e}");
                return Ok(tool_error(&McpError::from(e)));
            }
        };

        let payload = match serde_json::to_value(point) {
            Ok(payload) => payload,
            Err(e) => return Ok(tool_error(&McpError::from(e))),
        };

        Ok(with_structured(
            vec![Content::text(format!(
                "Geocoded \"{}\" to {point}",
                input.location.trim()
            ))],
            payload,
        ))
    }

    /// Search properties with the stored search template.
    #[tool(
        name = "search_template",
        description = "Search for properties using the properties search template. Pass the parameters from get_properties_template_params (use geocode_location for latitude/longitude) and the user's full original query."
    )]
    async fn search_template(
        &self,
        Parameters(input): Parameters<SearchTemplateInput>,
    ) -> Result<CallToolResult, ErrorData> {
        info!(
            "Executing search_template: query={}, {} params",
            input.original_query,
            input.params.len()
        );

        let params = SearchParams::from_json_map(input.params);
        match self
            .executor
            .run_search(
                &input.index,
                &input.template_id,
                &params,
                &input.original_query,
            )
            .await
        {
            Ok(formatted) => Ok(CallToolResult::success(formatted.into_contents())),
            Err(e) => Ok(tool_error(&e)),
        }
    }
}

#[tool_handler]
impl ServerHandler for PropertiesMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "propsearch-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Real-estate property search. Call get_properties_template_params to learn the \
                search parameters, geocode_location to turn a place into coordinates, then \
                search_template with the parameters and the user's original query."
                    .to_string(),
            ),
        }
    }
}

/// Run the MCP server with stdio transport
///
/// Serves until the client disconnects or the process receives Ctrl+C.
pub async fn run_mcp_server(server: PropertiesMcpServer) -> crate::Result<()> {
    info!("Starting MCP server on stdio");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| McpError::Transport(e.to_string()))?;

    info!("MCP server started, waiting for client requests");

    let cancel = service.cancellation_token();
    tokio::select! {
        result = service.waiting() => {
            let reason = result.map_err(|e| McpError::Transport(e.to_string()))?;
            info!("MCP client disconnected: {reason:?}");
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => error!("Error setting up signal handler: {e}"),
            }
            cancel.cancel();
        }
    }

    info!("MCP server shutting down");
    Ok(())
}
