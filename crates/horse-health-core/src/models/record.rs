//! Health record models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{lenient_number, lenient_string, optional_date};

/// The four record collections a horse owns, in enumeration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Vaccinations,
    Deworming,
    Farrier,
    Veterinary,
}

impl RecordKind {
    /// All kinds in the order their collections are merged.
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Vaccinations,
        RecordKind::Deworming,
        RecordKind::Farrier,
        RecordKind::Veterinary,
    ];

    /// Collection key in the persisted JSON.
    pub fn key(self) -> &'static str {
        match self {
            RecordKind::Vaccinations => "vaccinations",
            RecordKind::Deworming => "deworming",
            RecordKind::Farrier => "farrier",
            RecordKind::Veterinary => "veterinary",
        }
    }

    /// Human-readable label for a single record of this kind.
    ///
    /// Also the fallback title when the category field is blank.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Vaccinations => "Vaccination",
            RecordKind::Deworming => "Deworming",
            RecordKind::Farrier => "Farrier Visit",
            RecordKind::Veterinary => "Veterinary Visit",
        }
    }

    /// Capitalized collection name, used as the tag in the activity feed.
    pub fn display_name(self) -> &'static str {
        match self {
            RecordKind::Vaccinations => "Vaccinations",
            RecordKind::Deworming => "Deworming",
            RecordKind::Farrier => "Farrier",
            RecordKind::Veterinary => "Veterinary",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vaccinations" | "vaccination" | "vaccine" => Ok(RecordKind::Vaccinations),
            "deworming" | "dewormer" => Ok(RecordKind::Deworming),
            "farrier" => Ok(RecordKind::Farrier),
            "veterinary" | "vet" => Ok(RecordKind::Veterinary),
            other => Err(format!("unknown record kind: {}", other)),
        }
    }
}

/// A vaccination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    /// Vaccine type (category field)
    #[serde(rename = "type", default, deserialize_with = "lenient_string::deserialize")]
    pub vaccine_type: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_date")]
    pub next_due: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub veterinarian: String,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub notes: String,
}

/// A deworming treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deworming {
    /// Product used (category field)
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub product: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_date")]
    pub next_due: Option<NaiveDate>,
    /// Body weight in kg used for dosing
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub notes: String,
}

/// A farrier visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarrierVisit {
    /// Service performed (category field)
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub service: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_date")]
    pub next_due: Option<NaiveDate>,
    /// Farrier name
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub farrier: String,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub notes: String,
}

/// A veterinary visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VeterinaryVisit {
    /// Visit type (category field)
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub visit_type: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_date")]
    pub next_due: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub veterinarian: String,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub diagnosis: String,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub treatment: String,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub notes: String,
}

/// Any one health record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthRecord {
    Vaccination(Vaccination),
    Deworming(Deworming),
    Farrier(FarrierVisit),
    Veterinary(VeterinaryVisit),
}

impl HealthRecord {
    /// Which collection this record belongs to.
    pub fn kind(&self) -> RecordKind {
        match self {
            HealthRecord::Vaccination(_) => RecordKind::Vaccinations,
            HealthRecord::Deworming(_) => RecordKind::Deworming,
            HealthRecord::Farrier(_) => RecordKind::Farrier,
            HealthRecord::Veterinary(_) => RecordKind::Veterinary,
        }
    }

    /// Date the event happened.
    pub fn date(&self) -> NaiveDate {
        match self {
            HealthRecord::Vaccination(r) => r.date,
            HealthRecord::Deworming(r) => r.date,
            HealthRecord::Farrier(r) => r.date,
            HealthRecord::Veterinary(r) => r.date,
        }
    }

    /// Date the next occurrence is due, if any.
    pub fn next_due(&self) -> Option<NaiveDate> {
        match self {
            HealthRecord::Vaccination(r) => r.next_due,
            HealthRecord::Deworming(r) => r.next_due,
            HealthRecord::Farrier(r) => r.next_due,
            HealthRecord::Veterinary(r) => r.next_due,
        }
    }

    pub fn notes(&self) -> &str {
        match self {
            HealthRecord::Vaccination(r) => &r.notes,
            HealthRecord::Deworming(r) => &r.notes,
            HealthRecord::Farrier(r) => &r.notes,
            HealthRecord::Veterinary(r) => &r.notes,
        }
    }

    /// Raw category field: vaccine type, product, service or visit type.
    pub fn category(&self) -> &str {
        match self {
            HealthRecord::Vaccination(r) => &r.vaccine_type,
            HealthRecord::Deworming(r) => &r.product,
            HealthRecord::Farrier(r) => &r.service,
            HealthRecord::Veterinary(r) => &r.visit_type,
        }
    }

    /// Category field, or the kind's label when it is blank.
    pub fn title(&self) -> &str {
        let category = self.category().trim();
        if category.is_empty() {
            self.kind().label()
        } else {
            category
        }
    }
}

impl From<Vaccination> for HealthRecord {
    fn from(record: Vaccination) -> Self {
        HealthRecord::Vaccination(record)
    }
}

impl From<Deworming> for HealthRecord {
    fn from(record: Deworming) -> Self {
        HealthRecord::Deworming(record)
    }
}

impl From<FarrierVisit> for HealthRecord {
    fn from(record: FarrierVisit) -> Self {
        HealthRecord::Farrier(record)
    }
}

impl From<VeterinaryVisit> for HealthRecord {
    fn from(record: VeterinaryVisit) -> Self {
        HealthRecord::Veterinary(record)
    }
}
