//! Query engine over the places index.
//!
//! Application code reaches the index through this type, via the
//! `PlaceStore` capability. It validates parameters, builds the backend
//! query, and decodes hits back into records. It holds no mutable state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::config::SearchIndexConfig;
use crate::errors::SearchError;
use crate::interfaces::{PlaceStore, SearchEngineClient};
use crate::opensearch::queries::{build_list_page_query, build_nearest_query};
use crate::types::SearchHits;
use places_shared::{Location, Record};

/// Read-only query engine for listing and nearest-neighbor searches.
pub struct QueryEngine {
    client: Arc<dyn SearchEngineClient>,
    config: SearchIndexConfig,
}

impl QueryEngine {
    pub fn new(client: Arc<dyn SearchEngineClient>, config: SearchIndexConfig) -> Self {
        Self { client, config }
    }

    /// Reject windows the backend would refuse anyway.
    fn validate_window(&self, limit: u64, offset: u64) -> Result<(), SearchError> {
        if limit == 0 {
            return Err(SearchError::invalid_query("limit must be positive"));
        }
        let end = offset.saturating_add(limit);
        if end > self.config.max_result_window {
            return Err(SearchError::invalid_query(format!(
                "offset {} + limit {} exceeds max result window {}",
                offset, limit, self.config.max_result_window
            )));
        }
        Ok(())
    }

    fn validate_point(lat: f64, lon: f64) -> Result<(), SearchError> {
        if !Location::is_valid_lat(lat) {
            return Err(SearchError::invalid_query(format!("invalid latitude {}", lat)));
        }
        if !Location::is_valid_lon(lon) {
            return Err(SearchError::invalid_query(format!("invalid longitude {}", lon)));
        }
        Ok(())
    }

    /// Decode every hit's stored source into a record, in hit order.
    fn records_from_hits(hits: SearchHits) -> Result<Vec<Record>, SearchError> {
        hits.hits
            .into_iter()
            .map(|hit| {
                let source = hit
                    .source
                    .ok_or_else(|| SearchError::parse(format!("hit {} has no _source", hit.id)))?;
                serde_json::from_value(source)
                    .map_err(|e| SearchError::parse(format!("hit {}: {}", hit.id, e)))
            })
            .collect()
    }
}

#[async_trait]
impl PlaceStore for QueryEngine {
    #[instrument(skip(self))]
    async fn list_page(&self, limit: u64, offset: u64) -> Result<(Vec<Record>, u64), SearchError> {
        self.validate_window(limit, offset)?;

        let hits = self
            .client
            .search(&build_list_page_query(limit, offset))
            .await
            .map_err(|e| {
                error!(error = %e, "Cannot get places");
                e
            })?;

        let total = hits.total_value();
        let records = Self::records_from_hits(hits)?;

        debug!(returned = records.len(), total = total, "Listed places");
        Ok((records, total))
    }

    #[instrument(skip(self))]
    async fn nearest(&self, k: u64, lat: f64, lon: f64) -> Result<Vec<Record>, SearchError> {
        if k == 0 {
            return Err(SearchError::invalid_query("k must be positive"));
        }
        Self::validate_point(lat, lon)?;

        let hits = self
            .client
            .search(&build_nearest_query(k, lat, lon))
            .await
            .map_err(|e| {
                error!(error = %e, "Cannot get closest places");
                e
            })?;

        if let Some(distance) = hits.hits.first().and_then(|h| h.sort.first()) {
            debug!(nearest_km = %distance, "Closest place distance");
        }

        let mut records = Self::records_from_hits(hits)?;
        records.truncate(k as usize);
        Ok(records)
    }
}
