//! Streaming bulk-write session.
//!
//! Items are buffered into batches; each full batch is sent as one bulk
//! request on its own task, with at most `workers` requests in flight.
//! Workers only bump the atomic counters and log. `close` is the single
//! point where the caller waits for every outstanding request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::errors::IngestError;
use crate::loader::LoaderConfig;
use places_repository::{BulkItem, SearchEngineClient};

#[derive(Debug, Default)]
struct SessionCounters {
    flushed: AtomicU64,
    failed: AtomicU64,
}

/// Counts observed by a bulk session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Items handed to the session.
    pub submitted: u64,
    /// Items the backend accepted.
    pub flushed: u64,
    /// Items rejected by the backend or lost with a failed request.
    pub failed: u64,
}

/// A bulk-write session against one index.
pub struct BulkSession {
    client: Arc<dyn SearchEngineClient>,
    batch_size: usize,
    buffer: Vec<BulkItem>,
    permits: Arc<Semaphore>,
    in_flight: JoinSet<()>,
    counters: Arc<SessionCounters>,
    submitted: u64,
}

impl BulkSession {
    /// Open a session; nothing is sent until the first batch fills up.
    pub fn open(client: Arc<dyn SearchEngineClient>, config: &LoaderConfig) -> Self {
        let batch_size = config.batch_size.max(1);
        Self {
            client,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            permits: Arc::new(Semaphore::new(config.workers.max(1))),
            in_flight: JoinSet::new(),
            counters: Arc::new(SessionCounters::default()),
            submitted: 0,
        }
    }

    /// Queue an item, dispatching the current batch once it is full.
    ///
    /// Waits only when every worker is busy.
    pub async fn add(&mut self, item: BulkItem) -> Result<(), IngestError> {
        self.buffer.push(item);
        self.submitted += 1;

        if self.buffer.len() >= self.batch_size {
            self.dispatch().await?;
        }
        Ok(())
    }

    /// Send the tail batch and wait for every in-flight request.
    pub async fn close(mut self) -> Result<SessionStats, IngestError> {
        self.dispatch().await?;

        while let Some(joined) = self.in_flight.join_next().await {
            joined.map_err(|e| {
                error!(error = %e, "Bulk worker did not complete");
                IngestError::session(format!("bulk worker failed: {}", e))
            })?;
        }

        Ok(self.stats())
    }

    /// Current counts. Only final after `close`.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            submitted: self.submitted,
            flushed: self.counters.flushed.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }

    async fn dispatch(&mut self) -> Result<(), IngestError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| IngestError::session(e.to_string()))?;

        let client = Arc::clone(&self.client);
        let counters = Arc::clone(&self.counters);

        debug!(count = batch.len(), "Dispatching bulk batch");
        self.in_flight.spawn(async move {
            let _permit = permit;
            flush_batch(client.as_ref(), &batch, &counters).await;
        });

        Ok(())
    }
}

/// Send one batch and account for every item in it.
async fn flush_batch(client: &dyn SearchEngineClient, batch: &[BulkItem], counters: &SessionCounters) {
    match client.bulk_index(batch).await {
        Ok(outcomes) => {
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(()) => {
                        counters.flushed.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(failure) => {
                        counters.failed.fetch_add(1, Ordering::SeqCst);
                        error!(
                            document_id = %outcome.document_id,
                            kind = %failure.kind,
                            reason = failure.reason.as_deref().unwrap_or(""),
                            "Document rejected"
                        );
                    }
                }
            }

            let unreported = batch.len().saturating_sub(outcomes.len());
            if unreported > 0 {
                counters.failed.fetch_add(unreported as u64, Ordering::SeqCst);
                warn!(count = unreported, "Bulk response omitted items");
            }
        }
        Err(e) => {
            counters.failed.fetch_add(batch.len() as u64, Ordering::SeqCst);
            error!(
                error = %e,
                count = batch.len(),
                transport = e.is_transport(),
                "Bulk request failed"
            );
        }
    }
}
