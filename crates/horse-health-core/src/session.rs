//! Session state for a front end driving the repository.
//!
//! A session holds the currently selected horse, runs the confirmation step
//! before destructive operations, and recomputes derived views on demand.

use chrono::NaiveDate;
use log::info;

use crate::activity::{record_rows, recent_activity, ActivityEntry, RecordRow};
use crate::config::HealthConfig;
use crate::error::{HealthError, HealthResult};
use crate::models::{HealthRecord, Horse, NewHorse, RecordForm, RecordKind, ValidationError};
use crate::reminders::{local_today, Reminder, ReminderEngine};
use crate::repository::{parse_horses, Repository};
use crate::store::KeyValueStore;

pub const DELETE_RECORD_PROMPT: &str = "Are you sure you want to delete this record?";
pub const IMPORT_PROMPT: &str = "Importing will replace all existing horses. Continue?";

/// A yes/no decision from the user.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation that was already given elsewhere.
pub struct Confirmed;

impl Confirm for Confirmed {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Controller state over a repository.
pub struct Session<S: KeyValueStore> {
    repo: Repository<S>,
    config: HealthConfig,
    reminders: ReminderEngine,
    selected: Option<usize>,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, HealthConfig::default())
    }

    pub fn with_config(store: S, config: HealthConfig) -> Self {
        Self {
            repo: Repository::with_key(store, config.storage_key.clone()),
            reminders: ReminderEngine::new(config.reminder_window_days),
            config,
            selected: None,
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut Repository<S> {
        &mut self.repo
    }

    pub fn horses(&self) -> &[Horse] {
        self.repo.horses()
    }

    /// Message for the user when stored data could not be loaded at startup.
    ///
    /// The data itself is kept under the repository's backup key.
    pub fn load_warning(&self) -> Option<String> {
        self.repo.load_failure().map(|reason| {
            format!(
                "Saved data could not be loaded ({}). It will be kept under `{}` when you save.",
                reason,
                self.repo.backup_key()
            )
        })
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select_horse(&mut self, index: usize) -> HealthResult<&Horse> {
        self.repo.horse(index)?;
        self.selected = Some(index);
        self.repo.horse(index)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_horse(&self) -> Option<&Horse> {
        self.selected.and_then(|index| self.repo.horses().get(index))
    }

    fn require_selection(&self) -> HealthResult<usize> {
        match self.selected {
            Some(index) if index < self.repo.horses().len() => Ok(index),
            _ => Err(ValidationError::NoHorseSelected.into()),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a horse and return its index. The selection is unchanged.
    pub fn add_horse(&mut self, input: NewHorse) -> HealthResult<usize> {
        self.repo.add_horse(input)
    }

    /// Add a record to the selected horse.
    pub fn add_record(&mut self, form: RecordForm) -> HealthResult<()> {
        let index = self.require_selection()?;
        self.repo.add_record(index, form)
    }

    /// Delete a record from the selected horse after confirmation.
    ///
    /// Returns `Ok(None)` when the user declines.
    pub fn delete_record(
        &mut self,
        kind: RecordKind,
        display_index: usize,
        confirm: &mut impl Confirm,
    ) -> HealthResult<Option<HealthRecord>> {
        let index = self.require_selection()?;
        self.repo.storage_index(index, kind, display_index)?;
        if !confirm.confirm(DELETE_RECORD_PROMPT) {
            return Ok(None);
        }
        self.repo.delete_record(index, kind, display_index).map(Some)
    }

    /// Replace all horses with imported data after confirmation.
    ///
    /// Invalid data is rejected before asking. Returns the number of horses
    /// imported, or `Ok(None)` when the user declines.
    pub fn import(&mut self, raw: &str, confirm: &mut impl Confirm) -> HealthResult<Option<usize>> {
        let horses = parse_horses(raw)?;
        if !confirm.confirm(IMPORT_PROMPT) {
            info!("import of {} horses declined", horses.len());
            return Ok(None);
        }
        let count = horses.len();
        self.selected = None;
        self.repo.replace_all(horses)?;
        Ok(Some(count))
    }

    pub fn export(&self) -> HealthResult<String> {
        self.repo.export_all()
    }

    pub fn export_file_name(&self) -> &str {
        &self.config.export_file_name
    }

    /// Retry persisting after a failed write.
    pub fn flush(&mut self) -> HealthResult<()> {
        self.repo.flush()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Reminders across all horses as of `today`.
    pub fn reminders(&self, today: NaiveDate) -> Vec<Reminder> {
        self.reminders.compute(self.repo.horses(), today)
    }

    /// Reminders as of the local date.
    pub fn reminders_today(&self) -> Vec<Reminder> {
        self.reminders(local_today())
    }

    /// Recent activity feed for the selected horse.
    pub fn recent_activity(&self) -> HealthResult<Vec<ActivityEntry>> {
        let index = self.require_selection()?;
        let horse = self.repo.horse(index)?;
        Ok(recent_activity(horse, self.config.recent_activity_limit))
    }

    /// Tab view of one kind for the selected horse.
    pub fn records(&self, kind: RecordKind) -> HealthResult<Vec<RecordRow>> {
        let index = self.require_selection()?;
        let horse = self.repo.horse(index)?;
        Ok(record_rows(horse, kind))
    }
}

/// Map any error to the message shown to the user.
pub fn user_message(error: &HealthError) -> String {
    match error {
        HealthError::Persistence(e) => format!(
            "Error saving data: {}. Your changes are kept for this session.",
            e
        ),
        other => other.to_string(),
    }
}
