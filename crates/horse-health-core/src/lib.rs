//! Horse Health Core Library
//!
//! Local-first record keeping for horse health events: vaccinations,
//! deworming, farrier visits and veterinary visits.
//!
//! # Architecture
//!
//! ```text
//!   Front end (CLI / mobile host via FFI)
//!                  │  intents: add horse, add/delete record, import, export
//!                  ▼
//!               Session ── current selection, confirmation steps
//!                  │
//!                  ▼
//!              Repository ── validate → mutate → persist
//!                  │                         │
//!                  │                         ▼
//!                  │                 KeyValueStore ("horses" → JSON array)
//!                  │
//!        ┌─────────┴──────────┐
//!        ▼                    ▼
//!  Reminder Engine     Activity Aggregator
//!  (all horses)        (selected horse)
//! ```
//!
//! Derived views are recomputed from the in-memory collection on every call.
//!
//! # Modules
//!
//! - [`models`]: Horse, record variants, form validation
//! - [`store`]: Key-value storage (SQLite and in-memory)
//! - [`repository`]: Collection ownership, import/export
//! - [`reminders`]: Due and overdue reminders
//! - [`activity`]: Recent activity feed and per-kind views
//! - [`session`]: Selection and confirmation flow

pub mod activity;
pub mod config;
pub mod error;
pub mod models;
pub mod reminders;
pub mod repository;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use activity::{ActivityEntry, RecordDetail, RecordRow};
pub use config::HealthConfig;
pub use error::{HealthError, HealthResult, ImportError};
pub use models::{
    HealthRecord, Horse, NewHorse, RecordForm, RecordKind, RecordSet, ValidationError,
};
pub use reminders::{Reminder, ReminderEngine, ReminderStatus};
pub use repository::Repository;
pub use session::{Confirm, Confirmed, Session};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use models::{format_display_date, parse_iso_date, ISO_DATE_FORMAT};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HorseHealthError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<HealthError> for HorseHealthError {
    fn from(e: HealthError) -> Self {
        match e {
            HealthError::Validation(e) => HorseHealthError::ValidationError(e.to_string()),
            HealthError::Import(e) => HorseHealthError::ImportError(e.to_string()),
            HealthError::Persistence(e) => HorseHealthError::PersistenceError(e.to_string()),
            HealthError::NotFound(msg) => HorseHealthError::NotFound(msg),
            HealthError::Serialization(e) => HorseHealthError::SerializationError(e.to_string()),
        }
    }
}

impl From<StoreError> for HorseHealthError {
    fn from(e: StoreError) -> Self {
        HorseHealthError::PersistenceError(e.to_string())
    }
}

impl From<serde_json::Error> for HorseHealthError {
    fn from(e: serde_json::Error) -> Self {
        HorseHealthError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HorseHealthError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HorseHealthError::PersistenceError(format!("Lock poisoned: {}", e))
    }
}

fn parse_kind(kind: &str) -> Result<RecordKind, HorseHealthError> {
    kind.parse().map_err(HorseHealthError::InvalidInput)
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the record store at the given path.
///
/// `config_json` is an optional JSON document overriding [`HealthConfig`] defaults.
#[uniffi::export]
pub fn open_records(
    path: String,
    config_json: Option<String>,
) -> Result<Arc<HorseHealthCore>, HorseHealthError> {
    let config = match config_json {
        Some(json) => HealthConfig::from_json(&json)?,
        None => HealthConfig::default(),
    };
    let store = SqliteStore::open(&path)?;
    Ok(Arc::new(HorseHealthCore {
        session: Mutex::new(Session::with_config(store, config)),
    }))
}

/// Create an in-memory record store (for testing).
#[uniffi::export]
pub fn open_records_in_memory() -> Result<Arc<HorseHealthCore>, HorseHealthError> {
    let store = SqliteStore::open_in_memory()?;
    Ok(Arc::new(HorseHealthCore {
        session: Mutex::new(Session::new(store)),
    }))
}

/// Fixed category options for a record kind, excluding "Other".
#[uniffi::export]
pub fn category_options(kind: String) -> Result<Vec<String>, HorseHealthError> {
    let kind = parse_kind(&kind)?;
    Ok(models::category_options(kind)
        .iter()
        .map(|option| option.to_string())
        .collect())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
///
/// Each call holds the lock for its whole mutate-then-persist step. Hosts
/// confirm destructive operations with the user before calling them.
#[derive(uniffi::Object)]
pub struct HorseHealthCore {
    session: Mutex<Session<SqliteStore>>,
}

#[uniffi::export]
impl HorseHealthCore {
    // =========================================================================
    // Horse Operations
    // =========================================================================

    /// List all horses in stored order.
    pub fn list_horses(&self) -> Result<Vec<FfiHorse>, HorseHealthError> {
        let session = self.session.lock()?;
        Ok(session
            .horses()
            .iter()
            .enumerate()
            .map(|(index, horse)| FfiHorse::from_horse(index, horse))
            .collect())
    }

    /// Add a horse; returns its index.
    pub fn add_horse(
        &self,
        name: String,
        breed: Option<String>,
        age: Option<String>,
        colour: Option<String>,
    ) -> Result<u32, HorseHealthError> {
        let mut session = self.session.lock()?;
        let index = session.add_horse(NewHorse {
            name,
            breed,
            age,
            colour,
        })?;
        Ok(index as u32)
    }

    /// Select the horse the record operations apply to.
    pub fn select_horse(&self, index: u32) -> Result<FfiHorse, HorseHealthError> {
        let mut session = self.session.lock()?;
        let horse = session.select_horse(index as usize)?;
        Ok(FfiHorse::from_horse(index as usize, horse))
    }

    pub fn clear_selection(&self) -> Result<(), HorseHealthError> {
        let mut session = self.session.lock()?;
        session.clear_selection();
        Ok(())
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Add a record to the selected horse.
    pub fn add_record(&self, input: FfiRecordInput) -> Result<(), HorseHealthError> {
        let form = input.into_form()?;
        let mut session = self.session.lock()?;
        session.add_record(form)?;
        Ok(())
    }

    /// Delete the record at a position of the newest-first view.
    pub fn delete_record(&self, kind: String, display_index: u32) -> Result<(), HorseHealthError> {
        let kind = parse_kind(&kind)?;
        let mut session = self.session.lock()?;
        session.delete_record(kind, display_index as usize, &mut Confirmed)?;
        Ok(())
    }

    /// Every record of one kind for the selected horse, newest first.
    pub fn records(&self, kind: String) -> Result<Vec<FfiRecordRow>, HorseHealthError> {
        let kind = parse_kind(&kind)?;
        let session = self.session.lock()?;
        let rows = session.records(kind)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Recent activity for the selected horse.
    pub fn recent_activity(&self) -> Result<Vec<FfiActivityEntry>, HorseHealthError> {
        let session = self.session.lock()?;
        let entries = session.recent_activity()?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    /// Reminders across all horses; `today` defaults to the local date.
    pub fn reminders(&self, today: Option<String>) -> Result<Vec<FfiReminder>, HorseHealthError> {
        let today = match today {
            Some(text) => parse_iso_date(&text).ok_or_else(|| {
                HorseHealthError::InvalidInput(format!("invalid date: {}", text))
            })?,
            None => reminders::local_today(),
        };
        let session = self.session.lock()?;
        Ok(session
            .reminders(today)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Import / Export
    // =========================================================================

    /// Replace all horses with the given JSON array; returns the count imported.
    pub fn import_json(&self, raw: String) -> Result<u32, HorseHealthError> {
        let mut session = self.session.lock()?;
        let count = session.import(&raw, &mut Confirmed)?.unwrap_or_default();
        Ok(count as u32)
    }

    /// Pretty-printed JSON of all horses.
    pub fn export_json(&self) -> Result<String, HorseHealthError> {
        let session = self.session.lock()?;
        Ok(session.export()?)
    }

    pub fn export_file_name(&self) -> Result<String, HorseHealthError> {
        let session = self.session.lock()?;
        Ok(session.export_file_name().to_string())
    }

    /// Warning to show when stored data could not be loaded at startup.
    pub fn load_warning(&self) -> Result<Option<String>, HorseHealthError> {
        let session = self.session.lock()?;
        Ok(session.load_warning())
    }

    /// Check if the last write failed.
    pub fn has_unsaved_changes(&self) -> Result<bool, HorseHealthError> {
        let session = self.session.lock()?;
        Ok(session.repository().has_unsaved_changes())
    }

    /// Retry a failed write.
    pub fn flush(&self) -> Result<(), HorseHealthError> {
        let mut session = self.session.lock()?;
        session.flush()?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe horse profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHorse {
    pub index: u32,
    pub name: String,
    pub breed: String,
    pub age: String,
    pub colour: String,
    pub record_count: u32,
}

impl FfiHorse {
    fn from_horse(index: usize, horse: &Horse) -> Self {
        Self {
            index: index as u32,
            name: horse.name.clone(),
            breed: horse.breed.clone(),
            age: horse.age.clone(),
            colour: horse.colour.clone(),
            record_count: horse.record_count() as u32,
        }
    }
}

/// FFI-safe record form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordInput {
    pub kind: String,
    pub category: String,
    pub other_text: String,
    pub date: String,
    pub next_due: String,
    pub provider: String,
    pub weight: String,
    pub cost: String,
    pub diagnosis: String,
    pub treatment: String,
    pub notes: String,
}

impl FfiRecordInput {
    fn into_form(self) -> Result<RecordForm, HorseHealthError> {
        Ok(RecordForm {
            kind: parse_kind(&self.kind)?,
            category: self.category,
            other_text: self.other_text,
            date: self.date,
            next_due: self.next_due,
            provider: self.provider,
            weight: self.weight,
            cost: self.cost,
            diagnosis: self.diagnosis,
            treatment: self.treatment,
            notes: self.notes,
        })
    }
}

/// FFI-safe detail line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordDetail {
    pub label: String,
    pub value: String,
}

impl From<RecordDetail> for FfiRecordDetail {
    fn from(detail: RecordDetail) -> Self {
        Self {
            label: detail.label,
            value: detail.value,
        }
    }
}

/// FFI-safe tab view row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordRow {
    pub display_index: u32,
    pub kind: String,
    pub date: String,
    pub display_date: String,
    pub next_due: Option<String>,
    pub title: String,
    pub details: Vec<FfiRecordDetail>,
}

impl From<RecordRow> for FfiRecordRow {
    fn from(row: RecordRow) -> Self {
        Self {
            display_index: row.display_index as u32,
            kind: row.record.kind().key().to_string(),
            date: row.record.date().format(ISO_DATE_FORMAT).to_string(),
            display_date: format_display_date(row.record.date()),
            next_due: row
                .record
                .next_due()
                .map(|d| d.format(ISO_DATE_FORMAT).to_string()),
            title: row.title,
            details: row.details.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe activity feed entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiActivityEntry {
    pub kind: String,
    pub kind_name: String,
    pub date: String,
    pub display_date: String,
    pub title: String,
    pub summary: String,
}

impl From<ActivityEntry> for FfiActivityEntry {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            kind: entry.kind.key().to_string(),
            kind_name: entry.kind_name,
            date: entry.date.format(ISO_DATE_FORMAT).to_string(),
            display_date: format_display_date(entry.date),
            title: entry.title,
            summary: entry.summary,
        }
    }
}

/// FFI-safe reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminder {
    pub horse_name: String,
    pub kind: String,
    pub kind_label: String,
    pub item_name: String,
    pub due_date: String,
    pub days_diff: i64,
    pub overdue: bool,
    pub status_text: String,
}

impl From<Reminder> for FfiReminder {
    fn from(reminder: Reminder) -> Self {
        Self {
            status_text: reminder.status_text(),
            horse_name: reminder.horse_name,
            kind: reminder.kind.key().to_string(),
            kind_label: reminder.kind_label,
            item_name: reminder.item_name,
            due_date: reminder.due_date.format(ISO_DATE_FORMAT).to_string(),
            days_diff: reminder.days_diff,
            overdue: reminder.overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: &str, category: &str, date: &str, next_due: &str) -> FfiRecordInput {
        FfiRecordInput {
            kind: kind.into(),
            category: category.into(),
            other_text: String::new(),
            date: date.into(),
            next_due: next_due.into(),
            provider: String::new(),
            weight: String::new(),
            cost: String::new(),
            diagnosis: String::new(),
            treatment: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_ffi_session_flow() {
        let core = open_records_in_memory().unwrap();
        let index = core
            .add_horse("Bella".into(), None, Some("7".into()), None)
            .unwrap();
        assert_eq!(index, 0);

        let err = core
            .add_record(input("vaccinations", "Tetanus", "2024-01-01", ""))
            .unwrap_err();
        assert!(matches!(err, HorseHealthError::ValidationError(_)));

        core.select_horse(0).unwrap();
        core.add_record(input("vaccinations", "Tetanus", "2024-01-01", "2024-06-01"))
            .unwrap();

        let reminders = core.reminders(Some("2024-05-15".into())).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].days_diff, 17);
        assert_eq!(reminders[0].status_text, "Due in 17 days");

        let rows = core.records("vaccinations".into()).unwrap();
        assert_eq!(rows[0].display_date, "01/01/2024");
        assert_eq!(rows[0].next_due.as_deref(), Some("2024-06-01"));

        let feed = core.recent_activity().unwrap();
        assert_eq!(feed[0].summary, "Tetanus administered");

        core.delete_record("vaccinations".into(), 0).unwrap();
        assert!(core.records("vaccinations".into()).unwrap().is_empty());
        assert!(!core.has_unsaved_changes().unwrap());
    }

    #[test]
    fn test_ffi_import_export() {
        let core = open_records_in_memory().unwrap();
        core.add_horse("Bella".into(), None, None, None).unwrap();
        let exported = core.export_json().unwrap();

        let other = open_records_in_memory().unwrap();
        assert_eq!(other.import_json(exported).unwrap(), 1);
        assert_eq!(other.list_horses().unwrap()[0].name, "Bella");

        let err = other.import_json("{}".into()).unwrap_err();
        assert!(matches!(err, HorseHealthError::ImportError(_)));
        assert_eq!(other.export_file_name().unwrap(), "horse_health_data.json");
    }

    #[test]
    fn test_ffi_reports_unreadable_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("horses.db");
        let mut store = SqliteStore::open(&path).unwrap();
        store.set("horses", "[{\"name\": \"Bella\", \"records\": 5}]").unwrap();
        drop(store);

        let core = open_records(path.display().to_string(), None).unwrap();
        assert!(core.list_horses().unwrap().is_empty());
        let warning = core.load_warning().unwrap().unwrap();
        assert!(warning.contains("horses.unreadable"));

        core.add_horse("Comet".into(), None, None, None).unwrap();
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("horses.unreadable").unwrap().as_deref(),
            Some("[{\"name\": \"Bella\", \"records\": 5}]")
        );
    }

    #[test]
    fn test_ffi_invalid_kind() {
        assert!(matches!(
            category_options("saddlery".into()),
            Err(HorseHealthError::InvalidInput(_))
        ));
        assert_eq!(category_options("farrier".into()).unwrap()[0], "Trim");
    }
}
