//! Search engine client trait definition.
//!
//! This module defines the abstract interface for the raw backend operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch,
//! in-memory mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkItem, BulkItemOutcome, IndexStatus, SearchHits};

/// Abstract interface for search backend operations.
///
/// Every implementation targets a single index chosen at construction time.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: bulk batches are submitted
/// from concurrent tasks.
///
/// # Error Handling
///
/// Transport failures and deadline expiry are reported as
/// [`SearchError::is_transport`] errors so callers can tell them apart from
/// rejected data.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Check whether the index exists.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexStatus::Exists)` - On a 200 response
    /// * `Ok(IndexStatus::Missing)` - On a 404 response
    /// * `Err(SearchError::UnexpectedStatus)` - On any other status
    async fn index_status(&self) -> Result<IndexStatus, SearchError>;

    /// Create the index with the given mappings body.
    async fn create_index(&self, body: &Value) -> Result<(), SearchError>;

    /// Apply index-level settings to an existing index.
    async fn put_settings(&self, settings: &Value) -> Result<(), SearchError>;

    /// Submit a batch of `index` actions in a single bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(outcomes)` - One outcome per item, in request order. Rejected
    ///   items carry the backend's structured reason.
    /// * `Err(SearchError)` - If the request as a whole failed
    async fn bulk_index(&self, items: &[BulkItem]) -> Result<Vec<BulkItemOutcome>, SearchError>;

    /// Execute a search request body against the index.
    async fn search(&self, body: &Value) -> Result<SearchHits, SearchError>;

    /// Check if the search backend is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster is red
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
