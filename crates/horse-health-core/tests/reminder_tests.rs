//! Reminder window boundaries and status labels.

use chrono::{Duration, NaiveDate};
use horse_health_core::models::{RecordForm, RecordKind};
use horse_health_core::{MemoryStore, NewHorse, ReminderEngine, ReminderStatus, Session};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn session_with_dues(offsets: &[i64]) -> Session<MemoryStore> {
    let mut session = Session::new(MemoryStore::new());
    session.add_horse(NewHorse::named("Bella")).unwrap();
    session.select_horse(0).unwrap();
    for (i, offset) in offsets.iter().enumerate() {
        let due = today() + Duration::days(*offset);
        session
            .add_record(
                RecordForm::new(RecordKind::Farrier, format!("Visit {}", i), "2024-01-01")
                    .next_due(due.format("%Y-%m-%d").to_string()),
            )
            .unwrap();
    }
    session
}

#[test]
fn test_thirty_days_included_thirty_one_excluded() {
    let session = session_with_dues(&[30, 31]);
    let reminders = session.reminders(today());
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].days_diff, 30);
    assert_eq!(reminders[0].item_name, "Visit 0");
}

#[test]
fn test_due_today_and_overdue_labels() {
    let session = session_with_dues(&[0, -1]);
    let reminders = session.reminders(today());
    assert_eq!(reminders.len(), 2);

    // Sorted by due date: yesterday first.
    assert_eq!(reminders[0].days_diff, -1);
    assert!(reminders[0].overdue);
    assert_eq!(reminders[0].status(), ReminderStatus::Overdue { days: 1 });
    assert_eq!(reminders[0].status_text(), "Overdue by 1 day");

    assert_eq!(reminders[1].days_diff, 0);
    assert!(!reminders[1].overdue);
    assert_eq!(reminders[1].status_text(), "Due today");
}

#[test]
fn test_long_overdue_stays_listed() {
    let session = session_with_dues(&[-400]);
    let reminders = session.reminders(today());
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].status_text(), "Overdue by 400 days");
}

#[test]
fn test_engine_is_idempotent() {
    let session = session_with_dues(&[-3, 5, 12, 40]);
    let first = session.reminders(today());
    let second = session.reminders(today());
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_reminders_follow_deletions() {
    let mut session = session_with_dues(&[2]);
    assert_eq!(session.reminders(today()).len(), 1);
    session
        .delete_record(RecordKind::Farrier, 0, &mut horse_health_core::Confirmed)
        .unwrap();
    assert!(session.reminders(today()).is_empty());
}

#[test]
fn test_same_due_date_keeps_encounter_order() {
    let mut session = Session::new(MemoryStore::new());
    for name in ["Bella", "Storm"] {
        let index = session.add_horse(NewHorse::named(name)).unwrap();
        session.select_horse(index).unwrap();
        session
            .add_record(RecordForm::new(RecordKind::Veterinary, "Dental", "2024-01-01").next_due("2024-05-20"))
            .unwrap();
        session
            .add_record(RecordForm::new(RecordKind::Vaccinations, "Tetanus", "2024-01-01").next_due("2024-05-20"))
            .unwrap();
    }

    let reminders = ReminderEngine::default().compute(session.horses(), today());
    let order: Vec<(&str, &str)> = reminders
        .iter()
        .map(|r| (r.horse_name.as_str(), r.item_name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Bella", "Tetanus"),
            ("Bella", "Dental"),
            ("Storm", "Tetanus"),
            ("Storm", "Dental"),
        ]
    );
}
