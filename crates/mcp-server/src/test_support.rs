//! In-process fakes of the backend and geocoding capabilities

use async_trait::async_trait;
use propsearch_core::error::{Error, Result};
use propsearch_core::{SearchBackend, SearchParams, SearchResponse, StoredTemplate};
use propsearch_geocoding::{GeocodeResponse, GeocodingProvider};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A recorded `search_template` call
#[derive(Debug, Clone)]
pub(crate) struct RecordedSearch {
    pub index: String,
    pub template_id: String,
    pub params: SearchParams,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    template_source: Option<String>,
    responses: Mutex<VecDeque<Result<SearchResponse>>>,
    searches: Mutex<Vec<RecordedSearch>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, source: &str) -> Self {
        self.template_source = Some(source.to_string());
        self
    }

    pub fn with_response(self, response: serde_json::Value) -> Self {
        let parsed = serde_json::from_value(response).unwrap();
        self.responses.lock().unwrap().push_back(Ok(parsed));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::backend(message)));
        self
    }

    pub fn searches(&self) -> Vec<RecordedSearch> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search_template(
        &self,
        index: &str,
        template_id: &str,
        params: &SearchParams,
    ) -> Result<SearchResponse> {
        self.searches.lock().unwrap().push(RecordedSearch {
            index: index.to_string(),
            template_id: template_id.to_string(),
            params: params.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchResponse::default()))
    }

    async fn get_stored_template(&self, template_id: &str) -> Result<StoredTemplate> {
        match &self.template_source {
            Some(source) => Ok(StoredTemplate {
                id: template_id.to_string(),
                lang: Some("mustache".to_string()),
                source: source.clone(),
            }),
            None => Err(Error::not_found(format!(
                "Template '{template_id}' not found"
            ))),
        }
    }

    async fn run_inference(&self, _: &str, _: &str, _: u64) -> Result<()> {
        Ok(())
    }
}

/// Geocoding provider that always returns the same response
pub(crate) struct FixedGeocodingProvider(pub GeocodeResponse);

#[async_trait]
impl GeocodingProvider for FixedGeocodingProvider {
    async fn lookup(&self, _address: &str) -> propsearch_geocoding::Result<GeocodeResponse> {
        Ok(self.0.clone())
    }
}
