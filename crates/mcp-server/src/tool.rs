//! MCP tool definitions for property search
//!
//! Defines the input schemas of the `geocode_location` and `search_template`
//! tools. `get_properties_template_params` takes no input.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Request schema for the geocode_location MCP tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeocodeLocationInput {
    /// Free-text location, e.g. "Surfside Beach, TX" or "Austin, Texas 78701"
    #[schemars(description = "Location to geocode (city, address, or place name)")]
    pub location: String,
}

/// Request schema for the search_template MCP tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchTemplateInput {
    /// Index to search. Accepted for compatibility; the properties index is always used.
    #[schemars(description = "Index to search (the properties index is always used)")]
    pub index: String,

    /// Stored template id. Accepted for compatibility; the configured template is always used.
    #[schemars(description = "Search template id (the configured properties template is always used)")]
    pub template_id: String,

    /// Template parameter bindings, e.g. `{"distance": "10mi", "bedrooms": 3}`
    #[schemars(
        description = "Template parameters as returned by get_properties_template_params, e.g. latitude, longitude, distance, bedrooms, home_price"
    )]
    pub params: Map<String, Value>,

    /// The user's full natural language request
    #[schemars(description = "The complete original search request from the user")]
    pub original_query: String,
}
