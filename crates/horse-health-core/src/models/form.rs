//! Record form input and validation.
//!
//! A [`RecordForm`] carries the raw strings a form would submit. Validation
//! resolves the "Other" category, parses dates and numbers, and produces a
//! typed [`HealthRecord`] or a [`ValidationError`]. Nothing is mutated on
//! failure.

use thiserror::Error;

use super::fields::{parse_amount, parse_iso_date};
use super::record::{
    Deworming, FarrierVisit, HealthRecord, RecordKind, Vaccination, VeterinaryVisit,
};

/// Sentinel option that switches a category select to free text.
pub const OTHER: &str = "Other";

/// Missing or unusable form input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Horse name is required")]
    MissingName,

    #[error("{} is required", field_label(.0))]
    MissingCategory(RecordKind),

    #[error("Date is required")]
    MissingDate,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Please select a horse first")]
    NoHorseSelected,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn field_label(kind: &RecordKind) -> &'static str {
    category_field_label(*kind)
}

/// Name of the category field for messages and form labels.
pub fn category_field_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Vaccinations => "Vaccine type",
        RecordKind::Deworming => "Product",
        RecordKind::Farrier => "Service",
        RecordKind::Veterinary => "Visit type",
    }
}

/// Fixed options offered by a category select, excluding [`OTHER`].
pub fn category_options(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Vaccinations => &[
            "Tetanus",
            "Strangles",
            "Equine Influenza",
            "Equine Herpesvirus",
            "Hendra Virus",
            "West Nile Virus",
        ],
        RecordKind::Deworming => &[
            "Ivermectin",
            "Moxidectin",
            "Praziquantel",
            "Fenbendazole",
            "Pyrantel",
            "Abamectin",
        ],
        RecordKind::Farrier => &[
            "Trim",
            "Full Set of Shoes",
            "Front Shoes Only",
            "Reset",
            "Corrective Shoeing",
            "Hoof Repair",
        ],
        RecordKind::Veterinary => &[
            "Routine Check-up",
            "Dental",
            "Lameness Examination",
            "Colic",
            "Injury",
            "Pre-purchase Examination",
        ],
    }
}

/// Resolve a category select against its "Other" free-text companion.
///
/// Returns `None` when the resolved value is blank.
pub fn resolve_category(selected: &str, other_text: &str) -> Option<String> {
    let value = if selected.trim() == OTHER {
        other_text.trim()
    } else {
        selected.trim()
    };
    (!value.is_empty()).then(|| value.to_string())
}

/// Raw form submission for any record kind.
///
/// Fields that do not apply to `kind` are ignored. `provider` is the
/// veterinarian for vaccinations and vet visits, and the farrier's name for
/// farrier visits.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    pub kind: RecordKind,
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

impl RecordForm {
    /// Start a form for a kind with the category select and event date filled in.
    pub fn new(kind: RecordKind, category: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            kind,
            category: category.into(),
            other_text: String::new(),
            date: date.into(),
            next_due: String::new(),
            provider: String::new(),
            weight: String::new(),
            cost: String::new(),
            diagnosis: String::new(),
            treatment: String::new(),
            notes: String::new(),
        }
    }

    pub fn other(mut self, text: impl Into<String>) -> Self {
        self.other_text = text.into();
        self
    }

    pub fn next_due(mut self, date: impl Into<String>) -> Self {
        self.next_due = date.into();
        self
    }

    pub fn provider(mut self, name: impl Into<String>) -> Self {
        self.provider = name.into();
        self
    }

    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = weight.into();
        self
    }

    pub fn cost(mut self, cost: impl Into<String>) -> Self {
        self.cost = cost.into();
        self
    }

    pub fn diagnosis(mut self, text: impl Into<String>) -> Self {
        self.diagnosis = text.into();
        self
    }

    pub fn treatment(mut self, text: impl Into<String>) -> Self {
        self.treatment = text.into();
        self
    }

    pub fn notes(mut self, text: impl Into<String>) -> Self {
        self.notes = text.into();
        self
    }

    /// Validate the form and build the typed record.
    pub fn into_record(self) -> ValidationResult<HealthRecord> {
        let kind = self.kind;
        let category = resolve_category(&self.category, &self.other_text)
            .ok_or(ValidationError::MissingCategory(kind))?;

        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = parse_iso_date(&self.date)
            .ok_or_else(|| ValidationError::InvalidDate(self.date.trim().to_string()))?;
        let next_due = match self.next_due.trim() {
            "" => None,
            text => Some(
                parse_iso_date(text).ok_or_else(|| ValidationError::InvalidDate(text.to_string()))?,
            ),
        };

        let provider = self.provider.trim().to_string();
        let notes = self.notes.trim().to_string();

        Ok(match kind {
            RecordKind::Vaccinations => Vaccination {
                vaccine_type: category,
                date,
                next_due,
                veterinarian: provider,
                notes,
            }
            .into(),
            RecordKind::Deworming => Deworming {
                product: category,
                date,
                next_due,
                weight: parse_amount(&self.weight),
                notes,
            }
            .into(),
            RecordKind::Farrier => FarrierVisit {
                service: category,
                date,
                next_due,
                farrier: provider,
                cost: parse_amount(&self.cost),
                notes,
            }
            .into(),
            RecordKind::Veterinary => VeterinaryVisit {
                visit_type: category,
                date,
                next_due,
                veterinarian: provider,
                diagnosis: self.diagnosis.trim().to_string(),
                treatment: self.treatment.trim().to_string(),
                cost: parse_amount(&self.cost),
                notes,
            }
            .into(),
        })
    }
}
