//! # Places Indexer
//!
//! Entry point and configuration for the places directory.
//!
//! This crate wires the OpenSearch client, the ingest pipeline and the
//! service facade together from environment configuration.

pub mod config;

pub use config::{Dependencies, IndexerConfig};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] places_ingest::IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] places_repository::SearchError),

    /// Service error.
    #[error("Service error: {0}")]
    ServiceError(#[from] places_service::ServiceError),

    /// Output could not be rendered.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Short reason printed to the caller in place of the full error.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "invalid_configuration",
            Self::IngestError(e) if e.is_validation() => "invalid_input",
            Self::IngestError(_) => "ingest_failed",
            Self::SearchError(_) => "backend_unavailable",
            Self::ServiceError(e) => e.reason(),
            Self::SerializationError(_) => "output_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use places_ingest::IngestError;
    use places_repository::SearchError;
    use places_service::ServiceError;

    #[test]
    fn test_reasons() {
        assert_eq!(
            IndexingError::config("bad").reason(),
            "invalid_configuration"
        );
        assert_eq!(
            IndexingError::from(IngestError::MalformedRow {
                line: 2,
                expected: 6,
                found: 3
            })
            .reason(),
            "invalid_input"
        );
        assert_eq!(
            IndexingError::from(IngestError::read("gone")).reason(),
            "ingest_failed"
        );
        assert_eq!(
            IndexingError::from(SearchError::connection("refused")).reason(),
            "backend_unavailable"
        );
        assert_eq!(
            IndexingError::from(ServiceError::InvalidCredentials).reason(),
            "invalid_credentials"
        );
    }
}
