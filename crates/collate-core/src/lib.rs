//! # Collate Core
//!
//! Pure types for Collate: keys, credential tokens, and records.
//!
//! This crate contains no I/O, no storage, no networking. It defines the
//! values that flow between the gateway and the record store, and the
//! validation that decides whether a write request is well formed.
//!
//! ## Key Types
//!
//! - [`Key`] - Opaque, non-empty record identifier
//! - [`CredentialToken`] - Bearer secret that proves ownership of a key
//! - [`Record`] - A stored `(key, value, credential)` triple
//! - [`WriteRequest`] - A validated write, ready for the store

pub mod error;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use types::{CredentialToken, Key, Record};
pub use validation::WriteRequest;
