//! Activity feeds for a single horse.
//!
//! Two views are derived from a horse's record collections:
//!
//! - the recent activity feed, which merges all four kinds, newest first, and
//!   keeps the top few entries;
//! - a per-kind tab view listing every record of one kind, newest first.
//!
//! Both use a stable sort, so records sharing a date keep their enumeration
//! and insertion order. Tab rows carry the storage index of their record, and
//! [`display_order`] is the single source for mapping a row back to storage.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{format_display_date, HealthRecord, Horse, RecordKind};

/// Entries kept in the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// One entry in the merged recent activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub kind: RecordKind,
    /// Capitalized collection name, e.g. "Vaccinations"
    pub kind_name: String,
    pub date: NaiveDate,
    pub title: String,
    pub summary: String,
}

/// A labelled detail line for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDetail {
    pub label: String,
    pub value: String,
}

impl RecordDetail {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// One row of a per-kind tab view.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    /// Position in the newest-first view
    pub display_index: usize,
    /// Position in the owning collection
    pub storage_index: usize,
    pub title: String,
    pub details: Vec<RecordDetail>,
    pub record: HealthRecord,
}

/// Merge a horse's records into a newest-first feed of at most `limit` entries.
pub fn recent_activity(horse: &Horse, limit: usize) -> Vec<ActivityEntry> {
    let mut records = horse.records.all_records();
    records.sort_by(|a, b| b.date().cmp(&a.date()));

    records
        .into_iter()
        .take(limit)
        .map(|record| ActivityEntry {
            kind: record.kind(),
            kind_name: record.kind().display_name().to_string(),
            date: record.date(),
            title: record.title().to_string(),
            summary: summarize(&record),
        })
        .collect()
}

/// Storage indices of `records` in newest-first display order.
pub fn display_order(records: &[HealthRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[b].date().cmp(&records[a].date()));
    order
}

/// Every record of one kind, newest first.
pub fn record_rows(horse: &Horse, kind: RecordKind) -> Vec<RecordRow> {
    let records = horse.records.records(kind);
    display_order(&records)
        .into_iter()
        .enumerate()
        .map(|(display_index, storage_index)| {
            let record = records[storage_index].clone();
            RecordRow {
                display_index,
                storage_index,
                title: record.title().to_string(),
                details: record_details(&record),
                record,
            }
        })
        .collect()
}

/// One-line description of a record for the activity feed.
pub fn summarize(record: &HealthRecord) -> String {
    match record {
        HealthRecord::Vaccination(_) => format!("{} administered", record.title()),
        HealthRecord::Deworming(_) => format!("{} given", record.title()),
        HealthRecord::Farrier(visit) => format!(
            "{} by {}",
            record.title(),
            non_blank(&visit.farrier).unwrap_or("Farrier")
        ),
        HealthRecord::Veterinary(visit) => format!(
            "{} with {}",
            record.title(),
            non_blank(&visit.veterinarian).unwrap_or("Vet")
        ),
    }
}

/// Detail lines for a tab view row. Blank text and zero amounts are skipped.
pub fn record_details(record: &HealthRecord) -> Vec<RecordDetail> {
    let mut details = Vec::new();
    let mut push_text = |label: &str, value: &str| {
        if let Some(value) = non_blank(value) {
            details.push(RecordDetail::new(label, value));
        }
    };

    match record {
        HealthRecord::Vaccination(v) => {
            push_text("Veterinarian", &v.veterinarian);
        }
        HealthRecord::Deworming(d) => {
            if d.weight != 0.0 {
                push_text("Weight", &format!("{} kg", d.weight));
            }
        }
        HealthRecord::Farrier(f) => {
            push_text("Farrier", &f.farrier);
            if f.cost != 0.0 {
                push_text("Cost", &format_cost(f.cost));
            }
        }
        HealthRecord::Veterinary(v) => {
            push_text("Veterinarian", &v.veterinarian);
            push_text("Diagnosis", &v.diagnosis);
            push_text("Treatment", &v.treatment);
            if v.cost != 0.0 {
                push_text("Cost", &format_cost(v.cost));
            }
        }
    }

    if let Some(due) = record.next_due() {
        let label = match record.kind() {
            RecordKind::Veterinary => "Next Check-up",
            _ => "Next Due",
        };
        push_text(label, &format_display_date(due));
    }
    push_text("Notes", record.notes());

    details
}

/// Dollar amount with two decimals, e.g. `$85.00`.
pub fn format_cost(cost: f64) -> String {
    format!("${:.2}", cost)
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
