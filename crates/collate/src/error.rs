//! Error types for the Collate service.

use collate_core::ValidationError;
use collate_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Collate operations.
#[derive(Debug, Error)]
pub enum CollateError {
    /// No record exists for the key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The presented credential token does not own the key.
    #[error("access denied to write to: {0}")]
    AccessDenied(String),

    /// The request was malformed and never reached the store.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// The store could not complete the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

/// The bare kind of a [`CollateError`], for callers that map errors to
/// statuses without caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    InvalidRequest,
    Unavailable,
}

impl CollateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollateError::NotFound(_) => ErrorKind::NotFound,
            CollateError::AccessDenied(_) => ErrorKind::AccessDenied,
            CollateError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            CollateError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for Collate operations.
pub type Result<T> = std::result::Result<T, CollateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            CollateError::NotFound("k".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CollateError::AccessDenied("k".into()).kind(),
            ErrorKind::AccessDenied
        );
        assert_eq!(
            CollateError::from(ValidationError::EmptyKey).kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            CollateError::from(StoreError::Task("cancelled".into())).kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CollateError::AccessDenied("alpha".into()).to_string(),
            "access denied to write to: alpha"
        );
        assert_eq!(
            CollateError::NotFound("beta".into()).to_string(),
            "key not found: beta"
        );
    }
}
