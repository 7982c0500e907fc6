//! Dependency initialization and wiring for the places indexer.

use std::sync::Arc;
use tracing::info;

use super::IndexerConfig;
use crate::IndexingError;
use places_ingest::Ingestor;
use places_repository::{
    IndexProvisioner, OpenSearchClient, QueryEngine, SearchEngineClient,
};
use places_service::{JwtGate, PlacesService};

/// Container for all initialized dependencies.
pub struct Dependencies {
    client: Arc<dyn SearchEngineClient>,
    /// Creates the index on demand.
    pub provisioner: IndexProvisioner,
    /// Parses, provisions and loads an export.
    pub ingestor: Ingestor,
    /// Listing, recommendation and token endpoints.
    pub service: PlacesService,
}

impl Dependencies {
    /// Wire every component from `config`.
    ///
    /// No request is sent here; call [`Dependencies::verify_backend`] before
    /// commands that need the search backend.
    pub fn new(config: &IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index = %config.index.index_name,
            batch_size = config.loader.batch_size,
            workers = config.loader.workers,
            "Initializing dependencies"
        );

        let client: Arc<dyn SearchEngineClient> = Arc::new(
            OpenSearchClient::new(&config.opensearch_url, config.index.clone()).map_err(|e| {
                IndexingError::config(format!("Failed to create OpenSearch client: {}", e))
            })?,
        );

        let provisioner = IndexProvisioner::new(Arc::clone(&client), config.index.clone());
        let ingestor = Ingestor::new(
            Arc::clone(&client),
            config.index.clone(),
            config.loader.clone(),
        );
        let store = Arc::new(QueryEngine::new(Arc::clone(&client), config.index.clone()));
        let gate = Arc::new(JwtGate::new(config.gate.clone()));
        let service = PlacesService::new(store, gate, config.credentials.clone());

        Ok(Self {
            client,
            provisioner,
            ingestor,
            service,
        })
    }

    /// Check that the search backend is reachable and healthy.
    pub async fn verify_backend(&self) -> Result<(), IndexingError> {
        let healthy = self.client.health_check().await?;
        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiring_does_not_contact_backend() {
        let config = IndexerConfig::from_lookup(|name| match name {
            "OPENSEARCH_URL" => Some("http://127.0.0.1:1".to_string()),
            _ => None,
        })
        .unwrap();

        let deps = Dependencies::new(&config).unwrap();
        let grant = deps.service.issue_token("user", "qwerty").unwrap();
        assert!(!grant.response.token.is_empty());
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let config = IndexerConfig::from_lookup(|name| match name {
            "OPENSEARCH_URL" => Some("not a url".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(matches!(
            Dependencies::new(&config),
            Err(IndexingError::ConfigError(_))
        ));
    }
}
