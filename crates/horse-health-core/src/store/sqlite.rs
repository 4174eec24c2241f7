//! SQLite-backed key-value store.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{check_quota, KeyValueStore, StoreResult};

/// Schema for the key-value table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Key-value store in a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
    quota_bytes: Option<usize>,
}

impl SqliteStore {
    /// Open the store file at `path`, creating the table on first use.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Store that lives only as long as the value.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            quota_bytes: None,
        })
    }

    /// Reject values larger than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        check_quota(value, self.quota_bytes)?;
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}
