//! In-memory key-value store.

use std::collections::HashMap;

use super::{check_quota, KeyValueStore, StoreError, StoreResult};

/// Hash-map store that counts writes and can simulate an unavailable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with one key already written.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::default();
        store.values.insert(key.into(), value.into());
        store
    }

    /// Reject values larger than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Make every subsequent `set` fail until switched back.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Raw stored value, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        check_quota(value, self.quota_bytes)?;
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("horses").unwrap(), None);
        store.set("horses", "[]").unwrap();
        assert_eq!(store.get("horses").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_unavailable_rejects_writes() {
        let mut store = MemoryStore::with_value("horses", "[]");
        store.set_unavailable(true);
        assert!(matches!(
            store.set("horses", "[1]"),
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.raw("horses"), Some("[]"));
        assert_eq!(store.write_count(), 0);

        store.set_unavailable(false);
        store.set("horses", "[1]").unwrap();
        assert_eq!(store.raw("horses"), Some("[1]"));
    }
}
