//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client. Every request runs under the configured
//! deadline.

use std::future::Future;

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesPutSettingsParts},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::SearchIndexConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::types::{
    BulkItem, BulkItemFailure, BulkItemOutcome, BulkResponseBody, IndexStatus, SearchHits,
    SearchResponseBody,
};

/// OpenSearch client implementation.
///
/// Works against any backend speaking the OpenSearch/Elasticsearch REST API.
///
/// # Example
///
/// ```ignore
/// use places_repository::{OpenSearchClient, SearchIndexConfig};
///
/// let client = OpenSearchClient::new("http://localhost:9200", SearchIndexConfig::default())?;
/// let status = client.index_status().await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    config: SearchIndexConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `config` - Index name, request deadline and result window
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str, config: SearchIndexConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %config.index_name,
            timeout_ms = config.request_timeout.as_millis() as u64,
            "Created OpenSearch client"
        );

        Ok(Self { client, config })
    }

    /// Run a request under the configured deadline.
    async fn with_deadline<T, F>(&self, operation: &'static str, request: F) -> Result<T, SearchError>
    where
        F: Future<Output = Result<T, SearchError>>,
    {
        match timeout(self.config.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation = operation,
                    timeout_ms = self.config.request_timeout.as_millis() as u64,
                    "Request deadline exceeded"
                );
                Err(SearchError::Timeout {
                    operation,
                    timeout: self.config.request_timeout,
                })
            }
        }
    }

    /// Action/source line pairs for a bulk request.
    fn bulk_lines(items: &[BulkItem]) -> Vec<Value> {
        let mut lines = Vec::with_capacity(items.len() * 2);
        for item in items {
            lines.push(json!({ "index": { "_id": item.document_id } }));
            lines.push(item.source.clone());
        }
        lines
    }

    /// Pair each submitted item with the backend's per-item result.
    ///
    /// Items the backend did not report on are counted as rejected.
    fn bulk_outcomes(items: &[BulkItem], response: BulkResponseBody) -> Vec<BulkItemOutcome> {
        let mut reported = response.items.into_iter();

        items
            .iter()
            .map(|item| match reported.next() {
                Some(entry) => {
                    let result = entry.index;
                    match result.error {
                        Some(failure) => BulkItemOutcome::failure(&item.document_id, failure),
                        None if (200..300).contains(&result.status) => {
                            BulkItemOutcome::success(&item.document_id)
                        }
                        None => BulkItemOutcome::failure(
                            &item.document_id,
                            BulkItemFailure::new(
                                "unexpected_status",
                                format!("item answered with status {}", result.status),
                            ),
                        ),
                    }
                }
                None => BulkItemOutcome::failure(
                    &item.document_id,
                    BulkItemFailure::new("missing_item", "no result reported for item"),
                ),
            })
            .collect()
    }
}

fn transport_error(operation: &str, err: opensearch::Error) -> SearchError {
    SearchError::transport(format!("{}: {}", operation, err))
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    async fn index_status(&self) -> Result<IndexStatus, SearchError> {
        let index = self.config.index_name.as_str();

        self.with_deadline("index exists", async {
            let response = self
                .client
                .indices()
                .exists(IndicesExistsParts::Index(&[index]))
                .send()
                .await
                .map_err(|e| transport_error("index exists", e))?;

            match response.status_code().as_u16() {
                200 => Ok(IndexStatus::Exists),
                404 => Ok(IndexStatus::Missing),
                status => {
                    error!(status = status, "Unexpected index existence response");
                    Err(SearchError::UnexpectedStatus {
                        operation: "index exists",
                        status,
                    })
                }
            }
        })
        .await
    }

    #[instrument(skip(self, body), fields(index = %self.config.index_name))]
    async fn create_index(&self, body: &Value) -> Result<(), SearchError> {
        let index = self.config.index_name.as_str();

        self.with_deadline("create index", async {
            let response = self
                .client
                .indices()
                .create(IndicesCreateParts::Index(index))
                .body(body.clone())
                .send()
                .await
                .map_err(|e| transport_error("create index", e))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Create index request failed");
                return Err(SearchError::IndexCreationError(format!(
                    "Create index failed with status {}: {}",
                    status, error_body
                )));
            }

            debug!("Index created");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, settings), fields(index = %self.config.index_name))]
    async fn put_settings(&self, settings: &Value) -> Result<(), SearchError> {
        let index = self.config.index_name.as_str();

        self.with_deadline("put settings", async {
            let response = self
                .client
                .indices()
                .put_settings(IndicesPutSettingsParts::Index(&[index]))
                .body(settings.clone())
                .send()
                .await
                .map_err(|e| transport_error("put settings", e))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Put settings request failed");
                return Err(SearchError::SettingsError(format!(
                    "Put settings failed with status {}: {}",
                    status, error_body
                )));
            }

            Ok(())
        })
        .await
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn bulk_index(&self, items: &[BulkItem]) -> Result<Vec<BulkItemOutcome>, SearchError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.config.index_name.as_str();
        let body: Vec<JsonBody<Value>> = Self::bulk_lines(items)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        self.with_deadline("bulk", async {
            let response = self
                .client
                .bulk(BulkParts::Index(index))
                .body(body)
                .send()
                .await
                .map_err(|e| transport_error("bulk", e))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Bulk request failed");
                return Err(SearchError::bulk_index(format!(
                    "Bulk request failed with status {}: {}",
                    status, error_body
                )));
            }

            let parsed: BulkResponseBody = response
                .json()
                .await
                .map_err(|e| SearchError::parse(format!("bulk response: {}", e)))?;

            let reported_errors = parsed.errors;
            let outcomes = Self::bulk_outcomes(items, parsed);
            if reported_errors {
                let rejected = outcomes.iter().filter(|o| !o.is_success()).count();
                debug!(rejected = rejected, "Bulk response reports item errors");
            }

            Ok(outcomes)
        })
        .await
    }

    #[instrument(skip(self, body), fields(index = %self.config.index_name))]
    async fn search(&self, body: &Value) -> Result<SearchHits, SearchError> {
        let index = self.config.index_name.as_str();

        self.with_deadline("search", async {
            let response = self
                .client
                .search(SearchParts::Index(&[index]))
                .body(body.clone())
                .send()
                .await
                .map_err(|e| transport_error("search", e))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Search request failed");
                return Err(SearchError::query(format!(
                    "Search failed with status {}: {}",
                    status, error_body
                )));
            }

            let parsed: SearchResponseBody = response
                .json()
                .await
                .map_err(|e| SearchError::parse(format!("search response: {}", e)))?;

            Ok(parsed.hits)
        })
        .await
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        self.with_deadline("cluster health", async {
            let response = self
                .client
                .cluster()
                .health(ClusterHealthParts::None)
                .send()
                .await
                .map_err(|e| transport_error("cluster health", e))?;

            let health: Value = response
                .json()
                .await
                .map_err(|e| SearchError::parse(format!("cluster health: {}", e)))?;
            let status = health
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("unknown");

            info!(status = %status, "OpenSearch cluster status");

            Ok(status == "green" || status == "yellow")
        })
        .await
    }
}
