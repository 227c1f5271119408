//! Error types for Collate Core.

use thiserror::Error;

/// Reasons a read or write request is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("credential token must not be empty")]
    EmptyCredential,

    #[error("missing field: {0}")]
    MissingField(&'static str),
}
