//! Wire models for search backend responses
//!
//! These mirror the subset of the backend's JSON the tools read. Unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Total hit count, reported either as a bare number or wrapped as `{ "value": n }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Wrapped { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Wrapped { value } => *value,
        }
    }
}

/// A single matched document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,

    /// Field name to highlighted fragments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub highlight: BTreeMap<String, Vec<String>>,
}

/// The `hits` envelope of a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,

    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// Search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub took: Option<u64>,

    #[serde(default)]
    pub hits: HitsEnvelope,
}

impl SearchResponse {
    /// Total matching documents; falls back to the number of returned hits
    pub fn total(&self) -> u64 {
        self.hits
            .total
            .map(|t| t.value())
            .unwrap_or(self.hits.hits.len() as u64)
    }
}

/// A stored template as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTemplate {
    pub id: String,
    pub lang: Option<String>,
    pub source: String,
}
