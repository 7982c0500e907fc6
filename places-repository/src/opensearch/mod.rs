//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend, plus the index definition and query
//! bodies it is driven with.

mod client;
pub mod index_config;
pub mod queries;

pub use client::OpenSearchClient;
