//! Write request validation.
//!
//! The gateway decodes a write into up to three optional fields. A request
//! only reaches the store once all three are present and the key and
//! credential are non-empty. The value may be empty.

use crate::error::ValidationError;
use crate::types::{CredentialToken, Key};

/// A validated write: claim or update `key` with `value`, authorised by `credential`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub key: Key,
    pub value: String,
    pub credential: CredentialToken,
}

impl WriteRequest {
    /// Validate a write whose fields are all present.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            key: Key::new(key)?,
            value: value.into(),
            credential: CredentialToken::new(credential)?,
        })
    }

    /// Validate a write decoded from a form, where any field may be absent.
    ///
    /// Fields are checked in the order key, value, credential; the first
    /// missing one is reported.
    pub fn from_parts(
        key: Option<String>,
        value: Option<String>,
        credential: Option<String>,
    ) -> Result<Self, ValidationError> {
        let key = key.ok_or(ValidationError::MissingField("key"))?;
        let value = value.ok_or(ValidationError::MissingField("value"))?;
        let credential = credential.ok_or(ValidationError::MissingField("passhash"))?;
        Self::new(key, value, credential)
    }
}
