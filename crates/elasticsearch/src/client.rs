//! Elasticsearch HTTP client

use async_trait::async_trait;
use propsearch_core::config::{BackendAuth, Config};
use propsearch_core::error::{Error, Result, ResultExt};
use propsearch_core::{SearchBackend, SearchParams, SearchResponse, StoredTemplate};
use reqwest::{Certificate, Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

/// Request payload for `_search/template`
#[derive(Debug, Serialize)]
struct SearchTemplateRequest<'a> {
    id: &'a str,
    params: Value,
}

/// Request payload for `_inference`
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    input: &'a str,
}

/// Elasticsearch client speaking the REST API over reqwest
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: Url,
    auth: BackendAuth,
}

impl std::fmt::Debug for ElasticsearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchClient")
            .field("base_url", &redact_password(&self.base_url))
            .field("auth", &self.auth)
            .finish()
    }
}

impl ElasticsearchClient {
    /// Create a client from validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_parts(&config.url, config.auth(), config.ca_cert.as_deref())
    }

    /// Create a client from its individual settings
    ///
    /// # Arguments
    /// * `url` - Base URL of the cluster, e.g. `https://localhost:9200`
    /// * `auth` - Credentials sent with every request
    /// * `ca_cert` - Optional PEM file added as a trusted root certificate
    pub fn from_parts(url: &str, auth: BackendAuth, ca_cert: Option<&Path>) -> Result<Self> {
        let base_url = Url::parse(url.trim())
            .map_err(|e| Error::config(format!("Invalid Elasticsearch url '{url}': {e}")))?;

        let mut builder = Client::builder();
        if let Some(path) = ca_cert {
            for certificate in load_certificates(path)? {
                builder = builder.add_root_certificate(certificate);
            }
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth {
            BackendAuth::None => builder,
            BackendAuth::ApiKey(key) => builder.header("Authorization", format!("ApiKey {key}")),
            BackendAuth::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        }
    }

    async fn send(&self, builder: RequestBuilder, operation: &str) -> Result<Response> {
        builder.send().await.map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connection"
            } else if e.is_request() {
                "request build"
            } else if e.is_body() {
                "body"
            } else {
                "unknown"
            };
            warn!("Elasticsearch {operation} failed ({error_kind}): {e}");
            Error::backend(format!("{operation} failed ({error_kind}): {e}"))
        })
    }
}

fn redact_password(url: &Url) -> String {
    let mut url = url.clone();
    if url.password().is_some() && url.set_password(None).is_err() {
        return "***REDACTED***".to_string();
    }
    url.to_string()
}

/// Read every certificate in a PEM file; a file without any is rejected
fn load_certificates(path: &Path) -> Result<Vec<Certificate>> {
    let pem = std::fs::read(path)
        .context(format!("Failed to read CA certificate '{}'", path.display()))?;
    let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| {
        Error::config(format!(
            "Failed to parse CA certificate '{}': {e}",
            path.display()
        ))
    })?;
    if certificates.is_empty() {
        return Err(Error::config(format!(
            "Failed to parse CA certificate '{}': no PEM certificates found",
            path.display()
        )));
    }
    Ok(certificates)
}

/// Turn a non-success response into a backend error, preferring the
/// `error.reason` the cluster reports
async fn error_from_response(response: Response, operation: &str) -> Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    let reason = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/reason")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);
    warn!("Elasticsearch {operation} returned {status}: {reason}");
    Error::backend(format!("{operation} returned {status}: {reason}"))
}

/// Pull the template text out of a `_scripts` response body
fn parse_stored_template(template_id: &str, body: &Value) -> Result<StoredTemplate> {
    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return Err(Error::not_found(format!(
            "Template '{template_id}' not found"
        )));
    }

    let script = body
        .get("script")
        .ok_or_else(|| Error::backend(format!("Template '{template_id}' has no script")))?;

    let source = match script.get("source") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => {
            return Err(Error::backend(format!(
                "Template '{template_id}' has no source"
            )))
        }
        Some(other) => serde_json::to_string(other).map_err(|e| {
            Error::backend(format!("Template '{template_id}' source is malformed: {e}"))
        })?,
    };

    Ok(StoredTemplate {
        id: body
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or(template_id)
            .to_string(),
        lang: script
            .get("lang")
            .and_then(Value::as_str)
            .map(str::to_string),
        source,
    })
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search_template(
        &self,
        index: &str,
        template_id: &str,
        params: &SearchParams,
    ) -> Result<SearchResponse> {
        let url = self.endpoint(&[index, "_search", "template"])?;
        debug!(
            "Executing search template '{template_id}' on '{index}' with {} params",
            params.len()
        );

        let request = SearchTemplateRequest {
            id: template_id,
            params: params.to_json(),
        };
        let response = self
            .send(
                self.request(Method::POST, url).json(&request),
                "search template",
            )
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "search template").await);
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| Error::backend(format!("Failed to parse search response: {e}")))
    }

    async fn get_stored_template(&self, template_id: &str) -> Result<StoredTemplate> {
        let url = self.endpoint(&["_scripts", template_id])?;
        debug!("Fetching stored template '{template_id}'");

        let response = self
            .send(self.request(Method::GET, url), "get template")
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::not_found(format!(
                "Template '{template_id}' not found"
            )));
        }
        if !response.status().is_success() {
            return Err(error_from_response(response, "get template").await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::backend(format!("Failed to parse template response: {e}")))?;
        parse_stored_template(template_id, &body)
    }

    async fn run_inference(
        &self,
        inference_id: &str,
        input: &str,
        timeout_secs: u64,
    ) -> Result<()> {
        let url = self.endpoint(&["_inference", inference_id])?;
        let timeout = format!("{timeout_secs}s");

        let response = self
            .send(
                self.request(Method::POST, url)
                    .query(&[("timeout", timeout.as_str())])
                    .json(&InferenceRequest { input }),
                "inference",
            )
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "inference").await);
        }
        Ok(())
    }
}
