//! Template parameter discovery

use crate::error::{McpError, Result};
use propsearch_core::{extract_template_parameters, Error, SearchBackend, PARAMETER_GLOSSARY};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Placeholder names of a stored template plus the parameter glossary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParameters {
    pub template_id: String,
    pub names: BTreeSet<String>,
    pub descriptions: &'static str,
}

impl TemplateParameters {
    pub fn names_list(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn summary(&self) -> String {
        if self.names.is_empty() {
            format!("Template '{}' declares no parameters", self.template_id)
        } else {
            format!(
                "Required parameters for template '{}': {}",
                self.template_id,
                self.names_list().join(", ")
            )
        }
    }
}

/// Fetch a stored template and list the parameters it expects
///
/// The glossary is attached whatever subset the template declares.
pub async fn get_template_parameters(
    backend: &dyn SearchBackend,
    template_id: &str,
) -> Result<TemplateParameters> {
    let template = backend
        .get_stored_template(template_id)
        .await
        .map_err(|e| {
            warn!("Failed to fetch template '{template_id}': {e}");
            match e {
                Error::NotFound(msg) => McpError::Template(msg),
                other => McpError::Template(other.to_string()),
            }
        })?;

    let names = extract_template_parameters(&template.source);
    info!(
        "Template '{template_id}' declares {} parameters",
        names.len()
    );

    Ok(TemplateParameters {
        template_id: template_id.to_string(),
        names,
        descriptions: PARAMETER_GLOSSARY,
    })
}
