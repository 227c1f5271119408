//! Strong type definitions for Collate.
//!
//! Keys and credential tokens are both opaque strings on the wire. They are
//! newtypes here so one can never be passed where the other is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::ValidationError;

/// Identifies a record. Unique across the store and never empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key(String);

impl Key {
    /// Create a key, rejecting the empty string.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Key {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Key {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}

/// A bearer secret proving write authorisation for a key.
///
/// The token is opaque: Collate never interprets it, it only compares it
/// against the token stored when the key was first claimed. Comparison is
/// constant-time, and neither `Debug` nor logging ever show the secret;
/// use [`CredentialToken::fingerprint`] to identify a token in logs.
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct CredentialToken(String);

impl CredentialToken {
    /// Create a token, rejecting the empty string.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ValidationError::EmptyCredential);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time equality against another token.
    pub fn matches(&self, other: &CredentialToken) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }

    /// Short, non-reversible identifier for logs: the first 8 bytes of the
    /// BLAKE3 hash of the token, hex encoded.
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(self.0.as_bytes());
        hex::encode(&hash.as_bytes()[..8])
    }
}

impl PartialEq for CredentialToken {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for CredentialToken {}

impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialToken({})", self.fingerprint())
    }
}

impl TryFrom<String> for CredentialToken {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for CredentialToken {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

/// A stored record.
///
/// `credential` is the token presented by the first successful writer of
/// `key`. It never changes for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Key,
    pub value: String,
    pub credential: CredentialToken,
}

impl Record {
    pub fn new(key: Key, value: impl Into<String>, credential: CredentialToken) -> Self {
        Self {
            key,
            value: value.into(),
            credential,
        }
    }

    /// Whether `credential` is allowed to overwrite this record.
    pub fn is_owned_by(&self, credential: &CredentialToken) -> bool {
        self.credential.matches(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert_eq!(Key::new(""), Err(ValidationError::EmptyKey));
        assert!(Key::new("alpha").is_ok());
    }

    #[test]
    fn test_key_display_is_verbatim() {
        let key = Key::new("notes/2024 draft").unwrap();
        assert_eq!(key.to_string(), "notes/2024 draft");
        assert_eq!(format!("{:?}", key), "Key(\"notes/2024 draft\")");
    }

    #[test]
    fn test_key_serde_rejects_empty() {
        let key: Key = serde_json::from_str("\"alpha\"").unwrap();
        assert_eq!(key.as_str(), "alpha");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"alpha\"");
        assert!(serde_json::from_str::<Key>("\"\"").is_err());
    }

    #[test]
    fn test_empty_credential_rejected() {
        assert_eq!(
            CredentialToken::new("").unwrap_err(),
            ValidationError::EmptyCredential
        );
    }

    #[test]
    fn test_credential_matches() {
        let a = CredentialToken::new("h1").unwrap();
        let b = CredentialToken::new("h1").unwrap();
        let c = CredentialToken::new("h10").unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_credential_debug_hides_secret() {
        let token = CredentialToken::new("super-secret-hash").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret-hash"));
        assert!(debug.starts_with("CredentialToken("));
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = CredentialToken::new("h1").unwrap();
        let b = CredentialToken::new("h1").unwrap();
        let c = CredentialToken::new("h2").unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn test_record_ownership() {
        let owner = CredentialToken::new("h1").unwrap();
        let other = CredentialToken::new("wrong").unwrap();
        let record = Record::new(Key::new("alpha").unwrap(), "hello", owner.clone());
        assert!(record.is_owned_by(&owner));
        assert!(!record.is_owned_by(&other));
    }
}
