//! Index provisioning.
//!
//! Makes sure the places index exists with the right mappings and settings
//! before anything is written to it. Safe to run on every start.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::config::SearchIndexConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::index_config::{get_index_mappings, get_index_settings};
use crate::types::IndexStatus;

/// What `ensure_index` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The index was already there; nothing was changed.
    AlreadyExists,
    /// The index was created and its settings applied.
    Created,
}

/// Creates the places index on demand.
pub struct IndexProvisioner {
    client: Arc<dyn SearchEngineClient>,
    config: SearchIndexConfig,
}

impl IndexProvisioner {
    pub fn new(client: Arc<dyn SearchEngineClient>, config: SearchIndexConfig) -> Self {
        Self { client, config }
    }

    /// Ensure the index exists, creating it when the backend reports 404.
    ///
    /// An existing index is left untouched, schema and settings included.
    /// Any existence-check status other than 200/404, and any failure to
    /// create the index or apply its settings, is logged and returned.
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn ensure_index(&self) -> Result<ProvisionOutcome, SearchError> {
        let status = self.client.index_status().await.map_err(|e| {
            error!(error = %e, "Cannot check index existence");
            e
        })?;

        if status == IndexStatus::Exists {
            info!("Index already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        self.client
            .create_index(&get_index_mappings())
            .await
            .map_err(|e| {
                error!(error = %e, "Cannot create index");
                e
            })?;

        self.client
            .put_settings(&get_index_settings(self.config.max_result_window))
            .await
            .map_err(|e| {
                error!(error = %e, "Cannot apply index settings");
                e
            })?;

        info!(
            max_result_window = self.config.max_result_window,
            "Created index"
        );
        Ok(ProvisionOutcome::Created)
    }
}
