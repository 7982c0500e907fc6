//! Orchestrator module for the places ingest.
//!
//! Coordinates the parser, provisioner, and loader components.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoaderConfig};
use crate::parser::{parse_records, read_records};
use places_repository::{IndexProvisioner, SearchEngineClient, SearchIndexConfig};
use places_shared::{LoadSummary, Record};

/// Runs a full ingest: parse, provision, load.
///
/// The whole input is validated before the backend is touched, so a bad row
/// never leaves a half-written index behind.
pub struct Ingestor {
    provisioner: IndexProvisioner,
    loader: BulkLoader,
}

impl Ingestor {
    /// Create a new ingestor over the given client.
    pub fn new(
        client: Arc<dyn SearchEngineClient>,
        index_config: SearchIndexConfig,
        loader_config: LoaderConfig,
    ) -> Self {
        Self {
            provisioner: IndexProvisioner::new(Arc::clone(&client), index_config),
            loader: BulkLoader::with_config(client, loader_config),
        }
    }

    /// Ingest the export at `path`.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn run(&self, path: impl AsRef<Path>) -> Result<LoadSummary, IngestError> {
        let records = read_records(path)?;
        self.ingest(records).await
    }

    /// Ingest an export from any reader.
    pub async fn run_reader<R: Read>(&self, reader: R) -> Result<LoadSummary, IngestError> {
        let records = parse_records(reader)?;
        self.ingest(records).await
    }

    async fn ingest(&self, records: Vec<Record>) -> Result<LoadSummary, IngestError> {
        let outcome = self.provisioner.ensure_index().await?;
        info!(outcome = ?outcome, count = records.len(), "Index ready, loading records");

        self.loader.load(&records).await
    }
}
