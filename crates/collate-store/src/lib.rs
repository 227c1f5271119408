//! # Collate Store
//!
//! The record store for Collate: durable key-value storage where every key
//! is owned by the credential token that first wrote it.
//!
//! ## Overview
//!
//! The store abstracts persistence behind the [`Store`] trait so the service
//! layer is storage-agnostic. The primary implementation is [`SqliteStore`],
//! with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`PutResult`] - Outcome of an authorised write
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collate_core::{CredentialToken, Key};
//! use collate_store::{PutResult, SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("database.db").unwrap();
//!
//!     let key = Key::new("alpha").unwrap();
//!     let owner = CredentialToken::new("h1").unwrap();
//!
//!     // The first writer claims the key
//!     let result = store.put(&key, "hello", &owner).await.unwrap();
//!     assert_eq!(result, PutResult::Created);
//!
//!     let value = store.get(&key).await.unwrap();
//!     assert_eq!(value.as_deref(), Some("hello"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **First writer wins**: a put on an unused key creates the record and
//!   binds the presented token to it for good
//! - **Denial never mutates**: a put with the wrong token returns `Denied`
//!   and leaves value and token as they were
//! - **Atomic check-then-act**: existence check, ownership check and
//!   mutation run as one unit per put

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{PutResult, Store, StoreExt};
