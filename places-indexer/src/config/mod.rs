//! Environment configuration for the places indexer.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::IndexingError;
use places_ingest::LoaderConfig;
use places_repository::SearchIndexConfig;
use places_service::{Credentials, GateConfig};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Everything the indexer needs, resolved from the environment.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub opensearch_url: String,
    pub index: SearchIndexConfig,
    pub loader: LoaderConfig,
    pub gate: GateConfig,
    pub credentials: Credentials,
}

impl IndexerConfig {
    /// Read configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `PLACES_INDEX`: index name (default: places)
    /// - `OPENSEARCH_TIMEOUT_SECS`: per-request deadline (default: 30)
    /// - `PLACES_MAX_RESULT_WINDOW`: index result window (default: 20000)
    /// - `LOADER_BATCH_SIZE`: documents per bulk request (default: 500)
    /// - `LOADER_WORKERS`: bulk requests in flight (default: 4)
    /// - `PLACES_JWT_SECRET`: token signing secret (default: random per process)
    /// - `PLACES_USERNAME` / `PLACES_PASSWORD`: token credentials (default: user / qwerty)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let index_defaults = SearchIndexConfig::default();
        let loader_defaults = LoaderConfig::default();
        let credential_defaults = Credentials::default();

        let opensearch_url =
            lookup("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());

        let index = SearchIndexConfig::default()
            .with_index_name(lookup("PLACES_INDEX").unwrap_or(index_defaults.index_name))
            .with_request_timeout(Duration::from_secs(parse_var(
                &lookup,
                "OPENSEARCH_TIMEOUT_SECS",
                index_defaults.request_timeout.as_secs(),
            )?))
            .with_max_result_window(parse_var(
                &lookup,
                "PLACES_MAX_RESULT_WINDOW",
                index_defaults.max_result_window,
            )?);

        let loader = LoaderConfig {
            batch_size: parse_var(&lookup, "LOADER_BATCH_SIZE", loader_defaults.batch_size)?,
            workers: parse_var(&lookup, "LOADER_WORKERS", loader_defaults.workers)?,
        };
        if loader.batch_size == 0 || loader.workers == 0 {
            return Err(IndexingError::config(
                "LOADER_BATCH_SIZE and LOADER_WORKERS must be positive",
            ));
        }

        let gate = match lookup("PLACES_JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => GateConfig::new(secret),
            None => {
                warn!("PLACES_JWT_SECRET not set, tokens only verify within this process");
                GateConfig::default()
            }
        };

        let credentials = Credentials::new(
            lookup("PLACES_USERNAME").unwrap_or(credential_defaults.username),
            lookup("PLACES_PASSWORD").unwrap_or(credential_defaults.password),
        );

        Ok(Self {
            opensearch_url,
            index,
            loader,
            gate,
            credentials,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, IndexingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| IndexingError::config(format!("{} has invalid value '{}'", name, raw))),
        None => Ok(default),
    }
}
