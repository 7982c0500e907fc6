//! # Places Ingest
//!
//! This crate provides the ingest components for loading places from a
//! tab-separated export into the search index.
//!
//! ## Architecture
//!
//! The ingest follows the Parser-Provisioner-Loader pattern:
//!
//! 1. **Parser**: Reads and validates the whole export into records
//! 2. **Provisioner**: Ensures the index exists (from `places-repository`)
//! 3. **Loader**: Streams records into the index through a bulk session
//! 4. **Orchestrator**: Runs the three in that order

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod parser;

#[cfg(test)]
mod testing;

pub use errors::IngestError;
pub use loader::{BulkLoader, BulkSession, LoaderConfig, SessionStats};
pub use orchestrator::Ingestor;
pub use parser::{parse_records, read_records};
