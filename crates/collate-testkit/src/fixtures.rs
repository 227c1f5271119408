//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use collate_core::{CredentialToken, Key};
use collate_store::{PutResult, SqliteStore, Store, StoreError};
use tempfile::TempDir;
use tokio::sync::Barrier;

/// File name of the database inside a fixture's temp dir.
pub const DB_FILE: &str = "collate.db";

/// Build a key, panicking on invalid input.
pub fn key(s: &str) -> Key {
    Key::new(s).expect("fixture key must be non-empty")
}

/// Build a credential token, panicking on invalid input.
pub fn token(s: &str) -> CredentialToken {
    CredentialToken::new(s).expect("fixture token must be non-empty")
}

/// An on-disk SQLite store living in its own temp directory.
///
/// The directory is removed when the fixture is dropped.
pub struct SqliteFixture {
    dir: TempDir,
    pub store: SqliteStore,
}

impl SqliteFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SqliteStore::open(dir.path().join(DB_FILE)).expect("open sqlite store");
        Self { dir, store }
    }

    /// Path of the database file.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(DB_FILE)
    }

    /// Close the store and open the same file again, as a restart would.
    pub fn reopen(self) -> Self {
        let Self { dir, store } = self;
        store.close().expect("close sqlite store");
        let store = SqliteStore::open(dir.path().join(DB_FILE)).expect("reopen sqlite store");
        Self { dir, store }
    }
}

impl Default for SqliteFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// One writer's attempt in a [`contend`] race.
#[derive(Debug, Clone)]
pub struct Claim {
    pub writer: usize,
    pub value: String,
    pub credential: CredentialToken,
    pub result: PutResult,
}

/// Race `writers` concurrent puts on the same key, each with its own value
/// and token, and report every outcome.
///
/// All writers wait on a barrier before issuing their put so the attempts
/// overlap as much as the runtime allows.
pub async fn contend<S>(store: Arc<S>, key: &Key, writers: usize) -> Result<Vec<Claim>, StoreError>
where
    S: Store + 'static,
{
    let barrier = Arc::new(Barrier::new(writers));

    let handles: Vec<_> = (0..writers)
        .map(|writer| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let key = key.clone();
            tokio::spawn(async move {
                let value = format!("value-{}", writer);
                let credential = token(&format!("token-{}", writer));
                barrier.wait().await;
                let result = store.put(&key, &value, &credential).await?;
                Ok::<_, StoreError>(Claim {
                    writer,
                    value,
                    credential,
                    result,
                })
            })
        })
        .collect();

    let mut claims = Vec::with_capacity(writers);
    for handle in handles {
        claims.push(handle.await.expect("writer task panicked")?);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collate_store::MemoryStore;

    #[tokio::test]
    async fn test_fixture_survives_reopen() {
        let fixture = SqliteFixture::new();
        fixture
            .store
            .put(&key("alpha"), "hello", &token("h1"))
            .await
            .unwrap();
        let path = fixture.path();

        let fixture = fixture.reopen();
        assert_eq!(fixture.path(), path);
        assert_eq!(
            fixture.store.get(&key("alpha")).await.unwrap().as_deref(),
            Some("hello")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_contend_reports_every_writer() {
        let store = Arc::new(MemoryStore::new());
        let claims = contend(store, &key("k"), 8).await.unwrap();

        assert_eq!(claims.len(), 8);
        let mut writers: Vec<_> = claims.iter().map(|c| c.writer).collect();
        writers.sort_unstable();
        assert_eq!(writers, (0..8).collect::<Vec<_>>());
    }
}
