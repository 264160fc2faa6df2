//! Grapevine API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grapevine_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Tracing or span exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// An outbound client could not be built.
    #[error("startup error: {0}")]
    Startup(#[from] DomainError),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A domain or protocol failure.
    Domain(DomainError),
    /// The `GrapevineAction` header is missing or names no known action.
    UnknownAction(Option<String>),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::UnknownAction(Some(action)) => (
                StatusCode::BAD_REQUEST,
                "unknown_action",
                format!("unknown GrapevineAction: {action:?}"),
            ),
            Self::UnknownAction(None) => (
                StatusCode::BAD_REQUEST,
                "unknown_action",
                "missing GrapevineAction header".to_string(),
            ),
            Self::Domain(err) => {
                let (status, code) = match &err {
                    DomainError::GameNotFound(_) => (StatusCode::NOT_FOUND, "game_not_found"),
                    protocol if protocol.is_protocol_error() => {
                        (StatusCode::BAD_REQUEST, "protocol_error")
                    }
                    DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error"),
                };
                (status, code, err.to_string())
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        let response = err.into().into_response();
        response.status()
    }

    #[test]
    fn test_game_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::GameNotFound(7)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_protocol_errors_map_to_400() {
        for err in [
            DomainError::MalformedChain("empty".into()),
            DomainError::UnresolvedRecipient(9),
            DomainError::NoCandidateWords,
        ] {
            assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("lock poisoned".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_action_maps_to_400() {
        assert_eq!(
            status_of(ApiError::UnknownAction(Some("shout".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::UnknownAction(None)),
            StatusCode::BAD_REQUEST
        );
    }
}
