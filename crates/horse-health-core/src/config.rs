//! Runtime configuration.

use serde::{Deserialize, Serialize};

use crate::activity::RECENT_ACTIVITY_LIMIT;
use crate::reminders::DEFAULT_WINDOW_DAYS;
use crate::repository::{DEFAULT_STORAGE_KEY, EXPORT_FILE_NAME};

/// Tunables for storage, reminders and the activity feed.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// Key the horse collection is stored under
    pub storage_key: String,
    /// Lookahead for reminders, in days
    pub reminder_window_days: i64,
    /// Entries shown in the recent activity feed
    pub recent_activity_limit: usize,
    /// File name suggested for exports
    pub export_file_name: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            reminder_window_days: DEFAULT_WINDOW_DAYS,
            recent_activity_limit: RECENT_ACTIVITY_LIMIT,
            export_file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl HealthConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
