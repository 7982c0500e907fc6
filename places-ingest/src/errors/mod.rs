//! Error types for the places ingest.

use places_repository::SearchError;
use thiserror::Error;

/// Errors that can occur in the places ingest.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A longitude or latitude did not parse as a valid coordinate.
    #[error("Invalid coordinate on line {line}: {field} = '{value}'")]
    InvalidCoordinate {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// A data row does not have the expected columns.
    #[error("Malformed row on line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The input could not be read.
    #[error("Read error: {0}")]
    ReadError(String),

    /// A record could not be serialized for the index.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The bulk session could not be driven to completion.
    #[error("Session error: {0}")]
    SessionError(String),

    /// Error from the search backend.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl IngestError {
    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    /// Create a session error.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::SessionError(msg.into())
    }

    /// Whether the error is a data-validation failure rather than an I/O or
    /// backend failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. } | Self::MalformedRow { .. }
        )
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::ReadError(err.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
