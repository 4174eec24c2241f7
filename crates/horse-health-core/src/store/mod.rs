//! Key-value storage for the persisted horse blob.
//!
//! The repository only needs `get`/`set` of a single string value, so the
//! storage seam is a small trait with a SQLite implementation for real use and
//! an in-memory implementation for tests and embedding.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque string store keyed by name.
pub trait KeyValueStore {
    /// Read a value; `None` when the key has never been written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

fn check_quota(value: &str, limit: Option<usize>) -> StoreResult<()> {
    match limit {
        Some(limit) if value.len() > limit => Err(StoreError::QuotaExceeded {
            needed: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
