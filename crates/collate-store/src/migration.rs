//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a step that
//! transforms the schema from version N to N+1. Migrations run once, when
//! the store is opened, before any request is served.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 2;

/// Table used by the pre-migration `key, passhash, value` layout.
pub const LEGACY_TABLE: &str = "data";

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, now_millis()],
            )?;
            tracing::info!(version, "applied schema migration");
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        2 => apply_v2(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: the records table.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per key. The credential is the owner token and never changes.
        CREATE TABLE records (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            credential TEXT NOT NULL
        );
        "#,
    )?;

    Ok(())
}

/// Migration v2: adopt records from a legacy `data` table, if one exists.
///
/// The legacy table has no uniqueness constraint on `key`. Rows are copied
/// in insertion order and the first row for a key wins, which is the row
/// whose writer claimed the key. Rows with no key or no credential can never
/// be authorised and are skipped. The legacy table is left in place.
fn apply_v2(conn: &Connection) -> Result<()> {
    let has_legacy: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![LEGACY_TABLE],
        |row| row.get(0),
    )?;

    if !has_legacy {
        return Ok(());
    }

    let adopted = conn.execute(
        "INSERT OR IGNORE INTO records (key, value, credential)
         SELECT key, COALESCE(value, ''), passhash FROM data
         WHERE key IS NOT NULL AND key <> ''
           AND passhash IS NOT NULL AND passhash <> ''
         ORDER BY rowid",
        [],
    )?;

    tracing::info!(adopted, "adopted records from legacy table");
    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
