//! Request and response types exchanged with the search backend.

use serde::Deserialize;
use serde_json::Value;

/// Result of checking whether the index exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The backend answered 200.
    Exists,
    /// The backend answered 404.
    Missing,
}

/// A single `index` action in a bulk request.
#[derive(Debug, Clone)]
pub struct BulkItem {
    /// Backend document identifier (`_id`).
    pub document_id: String,
    /// Document body stored as `_source`.
    pub source: Value,
}

impl BulkItem {
    pub fn index(document_id: impl Into<String>, source: Value) -> Self {
        Self {
            document_id: document_id.into(),
            source,
        }
    }
}

/// Structured reason the backend gave for rejecting a bulk item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BulkItemFailure {
    /// Error type reported by the backend, e.g. `mapper_parsing_exception`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkItemFailure {
    pub fn new(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            reason: Some(reason.into()),
        }
    }
}

/// Per-item result of a bulk request, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemOutcome {
    pub document_id: String,
    pub result: Result<(), BulkItemFailure>,
}

impl BulkItemOutcome {
    pub fn success(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            result: Ok(()),
        }
    }

    pub fn failure(document_id: impl Into<String>, failure: BulkItemFailure) -> Self {
        Self {
            document_id: document_id.into(),
            result: Err(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// The `hits` section of a search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

impl SearchHits {
    /// Total number of matches, or 0 when the backend did not track it.
    pub fn total_value(&self) -> u64 {
        self.total.as_ref().map(|t| t.value).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    #[serde(default)]
    pub relation: String,
}

/// A single search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
    /// Sort values; for geo-distance sorts the first entry is the distance.
    #[serde(default)]
    pub sort: Vec<Value>,
}

/// Full search response body; only the hits are of interest.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponseBody {
    #[serde(default)]
    pub hits: SearchHits,
}

/// Full bulk response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BulkResponseBody {
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkResponseEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BulkResponseEntry {
    pub index: BulkResponseItem,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BulkResponseItem {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<BulkItemFailure>,
}
