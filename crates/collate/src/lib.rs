//! # Collate
//!
//! The service API for Collate: a minimal key-value store where the first
//! writer of a key owns it.
//!
//! ## Overview
//!
//! Clients write a value under a key together with a credential token. The
//! first write to an unused key claims it for that token; later writes
//! succeed only when they present the same token. Reads need no token.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collate::{Collate, CollateError, PutOutcome};
//! use collate::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("database.db").unwrap();
//!     let collate = Collate::new(store);
//!
//!     let outcome = collate.put("alpha", "hello", "h1").await.unwrap();
//!     assert_eq!(outcome, PutOutcome::Created);
//!
//!     let err = collate.put("alpha", "world", "wrong").await.unwrap_err();
//!     assert!(matches!(err, CollateError::AccessDenied(_)));
//!
//!     assert_eq!(collate.get("alpha").await.unwrap(), "hello");
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `collate::core` - Keys, tokens, records, validation
//! - `collate::store` - Storage abstraction and SQLite

pub mod error;
pub mod service;

pub use collate_core as core;
pub use collate_store as store;

pub use error::{CollateError, ErrorKind, Result};
pub use service::{Collate, PutOutcome};

pub use collate_core::{CredentialToken, Key, Record, WriteRequest};
