//! Search error types.
//!
//! This module defines the error types that can occur while talking to the
//! search backend.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during search backend operations.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// Failed to build a connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request could not be delivered or its response could not be read.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The request did not complete before its deadline.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// The backend answered with a status the caller does not handle.
    #[error("Unexpected status {status} from {operation}")]
    UnexpectedStatus { operation: &'static str, status: u16 },

    /// Failed to create the search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to apply index settings.
    #[error("Settings error: {0}")]
    SettingsError(String),

    /// A bulk request was rejected as a whole.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The query parameters are invalid.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Whether the error came from reaching the backend rather than from the
    /// data or parameters sent to it.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_) | Self::TransportError(_) | Self::Timeout { .. }
        )
    }
}
