//! Error types for the gateway, and their mapping to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use collate::{CollateError, ErrorKind};
use collate_core::ValidationError;
use collate_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced while handling a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected or failed the operation.
    #[error(transparent)]
    Collate(#[from] CollateError),

    /// The request body could not be decoded as a write form.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Collate(CollateError::InvalidRequest(e))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) => StatusCode::NOT_FOUND,
            ApiError::Collate(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
                // Malformed write shapes are answered like unknown requests.
                ErrorKind::InvalidRequest => StatusCode::NOT_FOUND,
                ErrorKind::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Collate(CollateError::NotFound(key)) => format!("Key not found: {}", key),
            ApiError::Collate(CollateError::AccessDenied(key)) => {
                format!("Access denied to write to: {}", key)
            }
            ApiError::Collate(CollateError::InvalidRequest(e)) => {
                tracing::debug!(error = %e, "invalid request");
                format!("Invalid request: {}", e)
            }
            ApiError::Malformed(detail) => {
                tracing::debug!(%detail, "malformed request");
                format!("Malformed request: {}", detail)
            }
            ApiError::Collate(CollateError::Unavailable(e)) => {
                tracing::error!(error = %e, "store unavailable");
                "Internal server error".to_string()
            }
        };

        (status, body).into_response()
    }
}

/// Errors that stop the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(CollateError::NotFound("k".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(CollateError::AccessDenied("k".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::from(ValidationError::MissingField("key")),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::Malformed("bad".into()), StatusCode::NOT_FOUND),
            (
                ApiError::from(CollateError::from(StoreError::Task("gone".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{:?}", error);
        }
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let error = ApiError::from(CollateError::from(StoreError::InvalidData(
            "secret path /var/lib/collate".into(),
        )));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
