//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use collate_core::{CredentialToken, Key, Record};

use crate::error::{Result, StoreError};
use crate::traits::{PutResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; a
/// put holds the write lock across its whole check-then-act sequence.
pub struct MemoryStore {
    records: RwLock<HashMap<Key, Record>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Key, Record>>> {
        self.records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Key, Record>>> {
        self.records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &Key) -> Result<Option<String>> {
        let records = self.read()?;
        Ok(records.get(key).map(|record| record.value.clone()))
    }

    async fn get_record(&self, key: &Key) -> Result<Option<Record>> {
        let records = self.read()?;
        Ok(records.get(key).cloned())
    }

    async fn put(
        &self,
        key: &Key,
        value: &str,
        credential: &CredentialToken,
    ) -> Result<PutResult> {
        let mut records = self.write()?;

        match records.get_mut(key) {
            None => {
                records.insert(
                    key.clone(),
                    Record::new(key.clone(), value, credential.clone()),
                );
                Ok(PutResult::Created)
            }
            Some(record) if record.is_owned_by(credential) => {
                record.value = value.to_owned();
                Ok(PutResult::Updated)
            }
            Some(_) => Ok(PutResult::Denied),
        }
    }

    async fn count(&self) -> Result<u64> {
        let records = self.read()?;
        Ok(records.len() as u64)
    }
}
