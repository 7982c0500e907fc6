//! Error types for the places service.

use serde::Serialize;
use thiserror::Error;

use crate::gate::GateError;
use places_repository::SearchError;
use places_shared::PageError;

/// Errors surfaced by the service facade.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid page: {0}")]
    InvalidPage(#[from] PageError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Access denied: {0}")]
    AccessDenied(GateError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(#[from] SearchError),

    #[error("Cannot issue token: {0}")]
    TokenIssueFailed(GateError),
}

impl ServiceError {
    /// Short machine-oriented reason, safe to hand to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPage(_) => "invalid_page",
            Self::InvalidCoordinates(_) => "invalid_coordinates",
            Self::AccessDenied(_) => "access_denied",
            Self::InvalidCredentials => "invalid_credentials",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::TokenIssueFailed(_) => "token_issue_failed",
        }
    }

    /// HTTP-style status for whatever transport serves the error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPage(_) | Self::InvalidCoordinates(_) => 400,
            Self::AccessDenied(_) | Self::InvalidCredentials => 401,
            Self::BackendUnavailable(_) | Self::TokenIssueFailed(_) => 500,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.reason(),
        }
    }
}

/// Body returned to clients for any failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons_and_status_codes() {
        let cases = vec![
            (ServiceError::from(PageError::BeforeFirst(0)), "invalid_page", 400),
            (
                ServiceError::InvalidCoordinates("lat".into()),
                "invalid_coordinates",
                400,
            ),
            (
                ServiceError::AccessDenied(GateError::Expired),
                "access_denied",
                401,
            ),
            (ServiceError::InvalidCredentials, "invalid_credentials", 401),
            (
                ServiceError::from(SearchError::connection("refused")),
                "backend_unavailable",
                500,
            ),
            (
                ServiceError::TokenIssueFailed(GateError::Signing("key".into())),
                "token_issue_failed",
                500,
            ),
        ];

        for (err, reason, status) in cases {
            assert_eq!(err.reason(), reason);
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn test_payload_hides_backend_detail() {
        let err = ServiceError::from(SearchError::connection("10.0.0.7:9200 refused"));
        let json = serde_json::to_string(&err.payload()).unwrap();

        assert_eq!(json, r#"{"error":"backend_unavailable"}"#);
    }
}
