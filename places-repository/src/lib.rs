//! # Places Repository
//!
//! This crate provides the traits and implementations for talking to the
//! search backend that stores places. It includes the error types, the
//! backend and capability interfaces, a concrete OpenSearch implementation,
//! the index provisioner and the query engine used by the service layer.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod provisioner;
pub mod query_engine;
pub mod types;

pub use config::SearchIndexConfig;
pub use errors::SearchError;
pub use interfaces::{PlaceStore, SearchEngineClient};
pub use opensearch::OpenSearchClient;
pub use provisioner::{IndexProvisioner, ProvisionOutcome};
pub use query_engine::QueryEngine;
pub use types::{BulkItem, BulkItemFailure, BulkItemOutcome, IndexStatus, SearchHit, SearchHits};
