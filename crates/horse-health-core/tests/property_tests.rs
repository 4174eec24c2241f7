//! Property tests for the export/import round trip and record-set invariants.

use chrono::{Duration, NaiveDate};
use horse_health_core::models::{
    Deworming, FarrierVisit, HealthRecord, RecordForm, RecordKind, Vaccination, VeterinaryVisit,
};
use horse_health_core::repository::{export_horses, parse_horses};
use horse_health_core::{Confirmed, Horse, MemoryStore, NewHorse, ReminderEngine, Session};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..730).prop_map(|offset| base_date() + Duration::days(offset))
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z .'-]{0,12}"
}

fn amount_strategy() -> impl Strategy<Value = f64> {
    (0u32..5000).prop_map(f64::from)
}

/// Category, date, next due date and notes.
fn common_strategy() -> impl Strategy<Value = (String, NaiveDate, Option<NaiveDate>, String)> {
    (
        "[A-Za-z ]{1,12}",
        date_strategy(),
        proptest::option::of(date_strategy()),
        text_strategy(),
    )
}

fn kind_strategy() -> impl Strategy<Value = RecordKind> {
    proptest::sample::select(RecordKind::ALL.to_vec())
}

fn record_strategy() -> impl Strategy<Value = HealthRecord> {
    prop_oneof![
        (common_strategy(), text_strategy()).prop_map(|((category, date, next_due, notes), vet)| {
            HealthRecord::from(Vaccination {
                vaccine_type: category,
                date,
                next_due,
                veterinarian: vet,
                notes,
            })
        }),
        (common_strategy(), amount_strategy()).prop_map(|((category, date, next_due, notes), weight)| {
            HealthRecord::from(Deworming {
                product: category,
                date,
                next_due,
                weight,
                notes,
            })
        }),
        (common_strategy(), text_strategy(), amount_strategy()).prop_map(
            |((category, date, next_due, notes), farrier, cost)| {
                HealthRecord::from(FarrierVisit {
                    service: category,
                    date,
                    next_due,
                    farrier,
                    cost,
                    notes,
                })
            }
        ),
        (common_strategy(), text_strategy(), text_strategy(), amount_strategy()).prop_map(
            |((category, date, next_due, notes), vet, diagnosis, cost)| {
                HealthRecord::from(VeterinaryVisit {
                    visit_type: category,
                    date,
                    next_due,
                    veterinarian: vet,
                    diagnosis,
                    treatment: String::new(),
                    cost,
                    notes,
                })
            }
        ),
    ]
}

fn horse_strategy() -> impl Strategy<Value = Horse> {
    (
        "[A-Z][a-z]{1,10}",
        proptest::option::of("[A-Za-z ]{1,12}"),
        proptest::collection::vec(record_strategy(), 0..12),
    )
        .prop_map(|(name, breed, records)| {
            let mut horse = Horse::new(NewHorse {
                name,
                breed,
                age: None,
                colour: None,
            })
            .unwrap();
            for record in records {
                horse.records.push(record);
            }
            horse
        })
}

#[derive(Debug, Clone)]
enum Op {
    AddHorse(String),
    Select(usize),
    AddRecord(RecordKind, String, i64),
    Delete(RecordKind, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[A-Za-z]{0,6}".prop_map(Op::AddHorse),
        (0usize..4).prop_map(Op::Select),
        (kind_strategy(), "[A-Za-z]{0,6}", 0i64..365)
            .prop_map(|(kind, category, offset)| Op::AddRecord(kind, category, offset)),
        (kind_strategy(), 0usize..4).prop_map(|(kind, index)| Op::Delete(kind, index)),
    ]
}

proptest! {
    #[test]
    fn prop_export_import_round_trip(horses in proptest::collection::vec(horse_strategy(), 0..5)) {
        let exported = export_horses(&horses).unwrap();
        let imported = parse_horses(&exported).unwrap();
        prop_assert_eq!(imported, horses);
    }

    #[test]
    fn prop_reminders_idempotent_and_sorted(
        horses in proptest::collection::vec(horse_strategy(), 0..5),
        offset in 0i64..730,
    ) {
        let today = base_date() + Duration::days(offset);
        let engine = ReminderEngine::default();
        let first = engine.compute(&horses, today);
        let second = engine.compute(&horses, today);
        prop_assert_eq!(&first, &second);
        for pair in first.windows(2) {
            prop_assert!(pair[0].due_date <= pair[1].due_date);
        }
        for reminder in &first {
            prop_assert!(reminder.days_diff <= 30);
            prop_assert_eq!(reminder.overdue, reminder.days_diff < 0);
        }
    }

    #[test]
    fn prop_record_sets_keep_four_collections(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let mut session = Session::new(MemoryStore::new());
        for op in ops {
            match op {
                Op::AddHorse(name) => {
                    let _ = session.add_horse(NewHorse::named(name));
                }
                Op::Select(index) => {
                    let _ = session.select_horse(index);
                }
                Op::AddRecord(kind, category, offset) => {
                    let date = base_date() + Duration::days(offset);
                    let form = RecordForm::new(kind, category, date.format("%Y-%m-%d").to_string());
                    let _ = session.add_record(form);
                }
                Op::Delete(kind, index) => {
                    let _ = session.delete_record(kind, index, &mut Confirmed);
                }
            }

            let exported: serde_json::Value =
                serde_json::from_str(&session.export().unwrap()).unwrap();
            for horse in exported.as_array().unwrap() {
                let records = horse["records"].as_object().unwrap();
                prop_assert_eq!(records.len(), 4);
                for kind in RecordKind::ALL {
                    prop_assert!(records[kind.key()].is_array());
                }
            }
            for horse in session.horses() {
                prop_assert!(!horse.name.is_empty());
                for record in horse.records.all_records() {
                    prop_assert!(!record.category().trim().is_empty());
                }
            }
        }
    }
}
