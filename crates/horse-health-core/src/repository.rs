//! Repository owning the horse collection.
//!
//! The whole collection is persisted as one JSON array under a single store
//! key. Every mutation validates first, mutates in memory, then persists. A
//! failed write keeps the in-memory change and marks the repository as having
//! unsaved changes so the caller can report it and retry with
//! [`Repository::flush`].
//!
//! Stored data that cannot be loaded is never overwritten in place: before the
//! first write it is copied to [`Repository::backup_key`].

use log::{info, warn};

use crate::activity::display_order;
use crate::error::{HealthError, HealthResult, ImportError};
use crate::models::{HealthRecord, Horse, NewHorse, RecordForm, RecordKind};
use crate::store::{KeyValueStore, StoreResult};

/// Store key for the horse collection.
pub const DEFAULT_STORAGE_KEY: &str = "horses";

/// File name for exported data.
pub const EXPORT_FILE_NAME: &str = "horse_health_data.json";

/// Suffix of the key that keeps stored data which failed to load.
pub const UNREADABLE_SUFFIX: &str = ".unreadable";

/// Parse import data. The top-level value must be an array of named horses.
pub fn parse_horses(raw: &str) -> Result<Vec<Horse>, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ImportError::Malformed(e.to_string()))?;
    if !value.is_array() {
        return Err(ImportError::InvalidFormat);
    }
    let horses: Vec<Horse> =
        serde_json::from_value(value).map_err(|e| ImportError::Malformed(e.to_string()))?;
    horses
        .into_iter()
        .enumerate()
        .map(|(i, horse)| {
            horse
                .normalized()
                .map_err(|_| ImportError::UnnamedHorse(i + 1))
        })
        .collect()
}

/// Pretty-printed JSON for an export file.
pub fn export_horses(horses: &[Horse]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(horses)
}

/// Owns the horse collection and its persistence.
pub struct Repository<S: KeyValueStore> {
    store: S,
    key: String,
    horses: Vec<Horse>,
    unsaved: bool,
    load_failure: Option<String>,
    backup_pending: bool,
}

impl<S: KeyValueStore> Repository<S> {
    /// Open the repository under the default key and load what is stored.
    pub fn open(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Open the repository under `key` and load what is stored.
    ///
    /// Loading never fails: unusable data leaves the collection empty and is
    /// reported through [`Repository::load_failure`].
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        let mut repo = Self {
            store,
            key: key.into(),
            horses: Vec::new(),
            unsaved: false,
            load_failure: None,
            backup_pending: false,
        };
        match repo.try_load() {
            Ok(horses) => repo.horses = horses,
            Err(e) => {
                warn!("could not load horses under `{}`: {}", repo.key, e);
                repo.load_failure = Some(e.to_string());
                repo.backup_pending = true;
            }
        }
        repo
    }

    /// Read the persisted collection.
    ///
    /// An absent, unreadable or malformed blob yields an empty collection.
    pub fn load_all(&self) -> Vec<Horse> {
        self.try_load().unwrap_or_else(|e| {
            warn!("could not load horses under `{}`: {}", self.key, e);
            Vec::new()
        })
    }

    /// Read the persisted collection, reporting why it cannot be used.
    pub fn try_load(&self) -> HealthResult<Vec<Horse>> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let horses = parse_horses(&blob)?;
        info!("loaded {} horses from `{}`", horses.len(), self.key);
        Ok(horses)
    }

    /// Why stored data could not be loaded at startup, if it could not.
    pub fn load_failure(&self) -> Option<&str> {
        self.load_failure.as_deref()
    }

    /// Key that keeps stored data which failed to load.
    pub fn backup_key(&self) -> String {
        format!("{}{}", self.key, UNREADABLE_SUFFIX)
    }

    /// Persist the full in-memory collection.
    pub fn save_all(&mut self) -> HealthResult<()> {
        let blob = serde_json::to_string(&self.horses)?;
        let result = self
            .preserve_unreadable()
            .and_then(|()| self.store.set(&self.key, &blob));
        match result {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                self.unsaved = true;
                warn!("could not save {} horses: {}", self.horses.len(), e);
                Err(e.into())
            }
        }
    }

    /// Copy data that failed to load aside before it is first overwritten.
    fn preserve_unreadable(&mut self) -> StoreResult<()> {
        if !self.backup_pending {
            return Ok(());
        }
        if let Some(raw) = self.store.get(&self.key)? {
            let backup_key = self.backup_key();
            self.store.set(&backup_key, &raw)?;
            warn!("kept unreadable horse data under `{}`", backup_key);
        }
        self.backup_pending = false;
        Ok(())
    }

    /// Retry a failed save. No-op when nothing is pending.
    pub fn flush(&mut self) -> HealthResult<()> {
        if self.unsaved {
            self.save_all()?;
        }
        Ok(())
    }

    /// Whether the last write failed and memory is ahead of the store.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Replace the whole collection with parsed import data and persist it.
    ///
    /// Destructive: callers confirm with the user first. On a parse failure
    /// the existing collection is untouched.
    pub fn import_all(&mut self, raw: &str) -> HealthResult<&[Horse]> {
        let horses = parse_horses(raw)?;
        self.replace_all(horses)?;
        Ok(&self.horses)
    }

    /// Replace the whole collection and persist it.
    pub fn replace_all(&mut self, horses: Vec<Horse>) -> HealthResult<()> {
        info!(
            "replacing {} horses with {} imported",
            self.horses.len(),
            horses.len()
        );
        self.horses = horses;
        self.save_all()
    }

    /// Pretty-printed JSON of the full collection.
    pub fn export_all(&self) -> HealthResult<String> {
        Ok(export_horses(&self.horses)?)
    }

    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    /// Get a horse by position.
    pub fn horse(&self, index: usize) -> HealthResult<&Horse> {
        self.horses
            .get(index)
            .ok_or_else(|| HealthError::NotFound(format!("no horse at index {}", index)))
    }

    /// Add a horse and return its index.
    pub fn add_horse(&mut self, input: NewHorse) -> HealthResult<usize> {
        let horse = Horse::new(input)?;
        info!("adding horse `{}`", horse.name);
        self.horses.push(horse);
        self.save_all()?;
        Ok(self.horses.len() - 1)
    }

    /// Validate a record form and append it to a horse.
    pub fn add_record(&mut self, horse_index: usize, form: RecordForm) -> HealthResult<()> {
        self.horse(horse_index)?;
        let record = form.into_record()?;
        info!(
            "adding {} `{}` to horse {}",
            record.kind().label(),
            record.title(),
            horse_index
        );
        self.horses[horse_index].records.push(record);
        self.save_all()
    }

    /// Delete the record shown at `display_index` of a kind's newest-first view.
    pub fn delete_record(
        &mut self,
        horse_index: usize,
        kind: RecordKind,
        display_index: usize,
    ) -> HealthResult<HealthRecord> {
        let storage_index = self.storage_index(horse_index, kind, display_index)?;
        let removed = self.horses[horse_index]
            .records
            .remove(kind, storage_index)
            .ok_or_else(|| record_not_found(kind, display_index))?;
        info!(
            "deleted {} `{}` from horse {}",
            kind.label(),
            removed.title(),
            horse_index
        );
        self.save_all()?;
        Ok(removed)
    }

    /// Resolve a display index to a storage index against the current order.
    pub fn storage_index(
        &self,
        horse_index: usize,
        kind: RecordKind,
        display_index: usize,
    ) -> HealthResult<usize> {
        let records = self.horse(horse_index)?.records.records(kind);
        display_order(&records)
            .get(display_index)
            .copied()
            .ok_or_else(|| record_not_found(kind, display_index))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn record_not_found(kind: RecordKind, display_index: usize) -> HealthError {
    HealthError::NotFound(format!(
        "no {} record at position {}",
        kind.key(),
        display_index
    ))
}
