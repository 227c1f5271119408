//! The Collate service: authorised reads and writes over a [`Store`].
//!
//! The service validates input, calls into the store, and turns store
//! outcomes into the error taxonomy callers see. It owns the store handle;
//! the process opens the store at startup, hands it to `Collate::new`, and
//! takes it back with [`Collate::into_store`] to close it on shutdown.

use collate_core::{Key, WriteRequest};
use collate_store::{PutResult, Store, StoreExt};

use crate::error::{CollateError, Result};

/// Outcome of an accepted write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The key was unused and is now owned by the presented token.
    Created,
    /// The presented token owns the key; the value was replaced.
    Updated,
}

/// The main Collate struct.
pub struct Collate<S: Store> {
    store: S,
}

impl<S: Store> Collate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to close it.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<String> {
        let key = Key::new(key)?;

        self.store
            .get(&key)
            .await?
            .ok_or_else(|| CollateError::NotFound(key.into_inner()))
    }

    /// Write `value` under `key`, authorised by `credential`.
    ///
    /// Claims the key if it is unused. Otherwise the credential must match
    /// the one that claimed it, or the write is rejected with
    /// [`CollateError::AccessDenied`] and nothing changes.
    pub async fn put(&self, key: &str, value: &str, credential: &str) -> Result<PutOutcome> {
        let request = WriteRequest::new(key, value, credential)?;
        self.put_request(&request).await
    }

    /// Apply an already validated write.
    pub async fn put_request(&self, request: &WriteRequest) -> Result<PutOutcome> {
        match self.store.apply(request).await? {
            PutResult::Created => {
                tracing::info!(
                    key = %request.key,
                    owner = %request.credential.fingerprint(),
                    "key claimed"
                );
                Ok(PutOutcome::Created)
            }
            PutResult::Updated => {
                tracing::debug!(
                    key = %request.key,
                    len = request.value.len(),
                    "value updated"
                );
                Ok(PutOutcome::Updated)
            }
            PutResult::Denied => {
                tracing::warn!(
                    key = %request.key,
                    presented = %request.credential.fingerprint(),
                    "write denied"
                );
                Err(CollateError::AccessDenied(request.key.to_string()))
            }
        }
    }
}
