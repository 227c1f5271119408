//! Store trait: the abstract interface for record persistence.
//!
//! This trait allows the service to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use collate_core::{CredentialToken, Key, Record, WriteRequest};

use crate::error::Result;

/// Result of a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutResult {
    /// The key was unused; a record now exists and the presented token owns it.
    Created,
    /// The token matched the owner; the value was replaced.
    Updated,
    /// The token did not match the owner. Nothing was written.
    Denied,
}

/// The Store trait: async interface for record persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Per-key linearizability**: for any single key, concurrent calls
///   behave as if executed one at a time in some order.
/// - **No partial writes**: a failed or denied put leaves no trace.
/// - **No deletes**: records live as long as the backing storage.
#[async_trait]
pub trait Store: Send + Sync {
    /// Get the current value for a key.
    async fn get(&self, key: &Key) -> Result<Option<String>>;

    /// Get the full record for a key, including its owner token.
    async fn get_record(&self, key: &Key) -> Result<Option<Record>>;

    /// Create or update a record, authorised by `credential`.
    ///
    /// # Returns
    /// - `Created` if no record existed for `key`; `credential` now owns it.
    /// - `Updated` if `credential` matches the owner; the value was replaced.
    /// - `Denied` if `credential` does not match the owner; nothing changed.
    async fn put(&self, key: &Key, value: &str, credential: &CredentialToken)
        -> Result<PutResult>;

    /// Number of records in the store.
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, key: &Key) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn get_record(&self, key: &Key) -> Result<Option<Record>> {
        (**self).get_record(key).await
    }

    async fn put(
        &self,
        key: &Key,
        value: &str,
        credential: &CredentialToken,
    ) -> Result<PutResult> {
        (**self).put(key, value, credential).await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Apply a validated write request.
    fn apply(
        &self,
        request: &WriteRequest,
    ) -> impl std::future::Future<Output = Result<PutResult>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn apply(&self, request: &WriteRequest) -> Result<PutResult> {
        self.put(&request.key, &request.value, &request.credential)
            .await
    }
}
