//! Loader module for the places ingest.
//!
//! Streams parsed records into the search index through a bulk session.

mod session;

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::errors::IngestError;
use places_repository::{BulkItem, SearchEngineClient};
use places_shared::{LoadSummary, Record};

pub use session::{BulkSession, SessionStats};

/// Default number of documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default number of bulk requests allowed in flight.
pub const DEFAULT_WORKERS: usize = 4;

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents to batch into one bulk request.
    pub batch_size: usize,
    /// Maximum number of bulk requests in flight at once.
    pub workers: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Loader that indexes records into the search engine.
///
/// Each record becomes one document whose `_id` is its 0-based position in
/// the input. Per-document rejections are counted and logged, never fatal.
pub struct BulkLoader {
    client: Arc<dyn SearchEngineClient>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new bulk loader with the given client.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self::with_config(client, LoaderConfig::default())
    }

    /// Create a new bulk loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// Load every record and report how many were accepted and rejected.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn load(&self, records: &[Record]) -> Result<LoadSummary, IngestError> {
        let started = Instant::now();
        let mut session = BulkSession::open(Arc::clone(&self.client), &self.config);

        for (position, record) in records.iter().enumerate() {
            let source = serde_json::to_value(record)?;
            session
                .add(BulkItem::index(position.to_string(), source))
                .await?;
        }

        let stats = session.close().await?;
        let summary = LoadSummary::new(stats.flushed, stats.failed, started.elapsed());

        if summary.has_failures() {
            warn!(
                flushed = summary.flushed,
                failed = summary.failed,
                elapsed_ms = summary.elapsed_ms(),
                "{}",
                summary
            );
        } else {
            info!(
                flushed = summary.flushed,
                elapsed_ms = summary.elapsed_ms(),
                throughput = summary.throughput(),
                "{}",
                summary
            );
        }

        Ok(summary)
    }
}
