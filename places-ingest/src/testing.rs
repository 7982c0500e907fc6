//! In-memory search backend shared by the ingest tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use places_repository::{
    BulkItem, BulkItemFailure, BulkItemOutcome, IndexStatus, SearchEngineClient, SearchError,
    SearchHits,
};

/// Mock search client for testing.
pub(crate) struct MockSearchClient {
    pub exists: AtomicBool,
    pub create_calls: AtomicUsize,
    pub bulk_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub stored: Mutex<Vec<(String, Value)>>,
    /// Document ids the backend rejects with a mapping error.
    pub reject_ids: HashSet<String>,
    /// A batch containing this document id fails as a whole.
    pub fail_batch_with: Option<String>,
    pub delay: Option<Duration>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            exists: AtomicBool::new(false),
            create_calls: AtomicUsize::new(0),
            bulk_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            stored: Mutex::new(Vec::new()),
            reject_ids: HashSet::new(),
            fail_batch_with: None,
            delay: None,
        }
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn index_status(&self) -> Result<IndexStatus, SearchError> {
        if self.exists.load(Ordering::SeqCst) {
            Ok(IndexStatus::Exists)
        } else {
            Ok(IndexStatus::Missing)
        }
    }

    async fn create_index(&self, _body: &Value) -> Result<(), SearchError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.exists.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put_settings(&self, _settings: &Value) -> Result<(), SearchError> {
        Ok(())
    }

    async fn bulk_index(&self, items: &[BulkItem]) -> Result<Vec<BulkItemOutcome>, SearchError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if let Some(poison) = &self.fail_batch_with {
            if items.iter().any(|i| &i.document_id == poison) {
                Err(SearchError::transport("connection reset"))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        };

        let outcome = match result {
            Ok(()) => {
                let mut stored = self.stored.lock().await;
                let outcomes = items
                    .iter()
                    .map(|item| {
                        if self.reject_ids.contains(&item.document_id) {
                            BulkItemOutcome::failure(
                                &item.document_id,
                                BulkItemFailure::new(
                                    "mapper_parsing_exception",
                                    "failed to parse field [location]",
                                ),
                            )
                        } else {
                            stored.push((item.document_id.clone(), item.source.clone()));
                            BulkItemOutcome::success(&item.document_id)
                        }
                    })
                    .collect();
                Ok(outcomes)
            }
            Err(e) => Err(e),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn search(&self, _body: &Value) -> Result<SearchHits, SearchError> {
        Ok(SearchHits::default())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}
