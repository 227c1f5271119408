//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Collate. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use collate_core::{CredentialToken, Key, Record};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{PutResult, Store};

/// How long a writer waits on a lock held by another connection to the same
/// file before giving up with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime. Writes additionally take an
/// `IMMEDIATE` transaction, so the ownership check and the write it guards
/// are serialised against other processes sharing the database file too.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        migration::migrate(&mut conn)?;

        tracing::debug!(path = %path.display(), journal_mode = %mode, "opened sqlite store");
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Close the underlying connection.
    ///
    /// Any error SQLite reports while finalising is returned. If an
    /// operation is still in flight on another task the connection is left
    /// to close when that task drops its handle.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex
                    .into_inner()
                    .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
                conn.close().map_err(|(_, e)| StoreError::Database(e))?;
                tracing::debug!("closed sqlite store");
                Ok(())
            }
            Err(_) => {
                tracing::warn!("sqlite store still in use at close; deferring to last handle");
                Ok(())
            }
        }
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Helper to convert a row to Record
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get("key")?, row.get("value")?, row.get("credential")?))
}

fn record_from_columns(key: String, value: String, credential: String) -> Result<Record> {
    let key = Key::new(key).map_err(|e| StoreError::InvalidData(e.to_string()))?;
    let credential = CredentialToken::new(credential)
        .map_err(|e| StoreError::InvalidData(format!("record {}: {}", key, e)))?;
    Ok(Record::new(key, value, credential))
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, key: &Key) -> Result<Option<String>> {
        let key = key.clone();

        self.run_blocking(move |conn| {
            conn.query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn get_record(&self, key: &Key) -> Result<Option<Record>> {
        let key = key.clone();

        self.run_blocking(move |conn| {
            let columns = conn
                .query_row(
                    "SELECT key, value, credential FROM records WHERE key = ?1",
                    params![key.as_str()],
                    row_to_record,
                )
                .optional()?;

            columns
                .map(|(key, value, credential)| record_from_columns(key, value, credential))
                .transpose()
        })
        .await
    }

    async fn put(
        &self,
        key: &Key,
        value: &str,
        credential: &CredentialToken,
    ) -> Result<PutResult> {
        let key = key.clone();
        let value = value.to_owned();
        let credential = credential.clone();

        self.run_blocking(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let owner: Option<String> = tx
                .query_row(
                    "SELECT credential FROM records WHERE key = ?1",
                    params![key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;

            let result = match owner {
                None => {
                    tx.execute(
                        "INSERT INTO records (key, value, credential) VALUES (?1, ?2, ?3)",
                        params![key.as_str(), value, credential.as_str()],
                    )?;
                    PutResult::Created
                }
                Some(owner) => {
                    let owner = CredentialToken::new(owner)
                        .map_err(|e| StoreError::InvalidData(format!("record {}: {}", key, e)))?;

                    // Dropping the transaction rolls it back; nothing was written.
                    if !owner.matches(&credential) {
                        return Ok(PutResult::Denied);
                    }

                    tx.execute(
                        "UPDATE records SET value = ?1 WHERE key = ?2",
                        params![value, key.as_str()],
                    )?;
                    PutResult::Updated
                }
            };

            tx.commit()?;
            Ok(result)
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.run_blocking(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}
