//! Reminder scheduling across all horses.
//!
//! A reminder is a projection of a record's `nextDue` date. Day offsets are
//! whole calendar days between two local dates, so the time of day never
//! shifts a reminder by one.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Horse, RecordKind};

/// Default lookahead window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// An upcoming or overdue obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub horse_name: String,
    pub kind: RecordKind,
    /// e.g. "Farrier Visit"
    pub kind_label: String,
    /// Vaccine type, product, service or visit type
    pub item_name: String,
    pub due_date: NaiveDate,
    /// Days from today to the due date; negative when overdue
    pub days_diff: i64,
    pub overdue: bool,
}

/// Where a reminder sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatus {
    Overdue { days: i64 },
    DueToday,
    Upcoming { days: i64 },
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderStatus::Overdue { days } => write!(f, "Overdue by {}", plural_days(*days)),
            ReminderStatus::DueToday => f.write_str("Due today"),
            ReminderStatus::Upcoming { days } => write!(f, "Due in {}", plural_days(*days)),
        }
    }
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

impl Reminder {
    pub fn status(&self) -> ReminderStatus {
        match self.days_diff {
            d if d < 0 => ReminderStatus::Overdue { days: -d },
            0 => ReminderStatus::DueToday,
            d => ReminderStatus::Upcoming { days: d },
        }
    }

    /// Human-readable status, e.g. "Due in 17 days".
    pub fn status_text(&self) -> String {
        self.status().to_string()
    }
}

/// Whole calendar days from `today` until `due`.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Builds the ranked reminder list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderEngine {
    window_days: i64,
}

impl Default for ReminderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl ReminderEngine {
    /// Engine including records due within `window_days` (and all overdue ones).
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Every record due on or before `today + window`, earliest due date first.
    ///
    /// Records without a due date never produce a reminder. Overdue records
    /// stay listed however old they are. Reminders sharing a due date keep
    /// horse, kind and insertion order.
    pub fn compute(&self, horses: &[Horse], today: NaiveDate) -> Vec<Reminder> {
        let mut reminders: Vec<Reminder> = horses
            .iter()
            .flat_map(|horse| {
                horse.records.all_records().into_iter().filter_map(move |record| {
                    let due_date = record.next_due()?;
                    let days_diff = days_until(due_date, today);
                    (days_diff <= self.window_days).then(|| Reminder {
                        horse_name: horse.name.clone(),
                        kind: record.kind(),
                        kind_label: record.kind().label().to_string(),
                        item_name: record.title().to_string(),
                        due_date,
                        days_diff,
                        overdue: days_diff < 0,
                    })
                })
            })
            .collect();

        reminders.sort_by_key(|reminder| reminder.due_date);
        reminders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthRecord, NewHorse, Vaccination};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn horse(name: &str, dues: &[(&str, Option<&str>)]) -> Horse {
        let mut horse = Horse::new(NewHorse::named(name)).unwrap();
        for (vaccine, due) in dues {
            horse.records.push(HealthRecord::from(Vaccination {
                vaccine_type: vaccine.to_string(),
                date: date("2024-01-01"),
                next_due: due.map(date),
                veterinarian: String::new(),
                notes: String::new(),
            }));
        }
        horse
    }

    #[test]
    fn test_days_until() {
        assert_eq!(days_until(date("2024-06-01"), date("2024-05-15")), 17);
        assert_eq!(days_until(date("2024-05-14"), date("2024-05-15")), -1);
        assert_eq!(days_until(date("2024-03-01"), date("2024-02-28")), 2);
    }

    #[test]
    fn test_status_text() {
        let mut reminder = Reminder {
            horse_name: "Bella".into(),
            kind: RecordKind::Vaccinations,
            kind_label: "Vaccination".into(),
            item_name: "Tetanus".into(),
            due_date: date("2024-05-15"),
            days_diff: 0,
            overdue: false,
        };
        assert_eq!(reminder.status_text(), "Due today");
        reminder.days_diff = 1;
        assert_eq!(reminder.status_text(), "Due in 1 day");
        reminder.days_diff = 17;
        assert_eq!(reminder.status_text(), "Due in 17 days");
        reminder.days_diff = -1;
        assert_eq!(reminder.status_text(), "Overdue by 1 day");
        reminder.days_diff = -40;
        assert_eq!(reminder.status(), ReminderStatus::Overdue { days: 40 });
    }

    #[test]
    fn test_window_and_missing_due_dates() {
        let horses = vec![horse(
            "Bella",
            &[
                ("Tetanus", Some("2024-06-14")),
                ("Strangles", Some("2024-06-15")),
                ("Hendra Virus", None),
                ("Equine Influenza", Some("2020-01-01")),
            ],
        )];
        let reminders = ReminderEngine::default().compute(&horses, date("2024-05-15"));
        let items: Vec<&str> = reminders.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(items, vec!["Equine Influenza", "Tetanus"]);
        assert!(reminders[0].overdue);
        assert_eq!(reminders[1].days_diff, 30);
    }

    #[test]
    fn test_sorted_by_due_date_across_horses() {
        let horses = vec![
            horse("Bella", &[("Tetanus", Some("2024-05-20"))]),
            horse("Storm", &[("Strangles", Some("2024-05-16")), ("Tetanus", Some("2024-05-20"))]),
        ];
        let reminders = ReminderEngine::default().compute(&horses, date("2024-05-15"));
        let order: Vec<(&str, &str)> = reminders
            .iter()
            .map(|r| (r.horse_name.as_str(), r.item_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("Storm", "Strangles"), ("Bella", "Tetanus"), ("Storm", "Tetanus")]
        );
    }

    #[test]
    fn test_custom_window() {
        let horses = vec![horse("Bella", &[("Tetanus", Some("2024-05-25"))])];
        let engine = ReminderEngine::new(7);
        assert!(engine.compute(&horses, date("2024-05-15")).is_empty());
        assert_eq!(engine.compute(&horses, date("2024-05-18")).len(), 1);
    }
}
