//! Horse models.

use serde::{Deserialize, Serialize};

use super::fields::lenient_string;
use super::form::ValidationError;
use super::record::{Deworming, FarrierVisit, HealthRecord, RecordKind, Vaccination, VeterinaryVisit};

/// Placeholder for profile fields the user left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

/// A horse and every health record logged against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Horse {
    #[serde(deserialize_with = "lenient_string::deserialize")]
    pub name: String,
    #[serde(default = "not_specified", deserialize_with = "lenient_string::deserialize")]
    pub breed: String,
    #[serde(default = "not_specified", deserialize_with = "lenient_string::deserialize")]
    pub age: String,
    #[serde(default = "not_specified", deserialize_with = "lenient_string::deserialize")]
    pub colour: String,
    /// Always carries all four collections, even when empty
    #[serde(default)]
    pub records: RecordSet,
}

/// Profile input for a new horse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHorse {
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub colour: Option<String>,
}

impl NewHorse {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Horse {
    /// Create a horse with empty record collections.
    pub fn new(input: NewHorse) -> Result<Self, ValidationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        Ok(Self {
            name: name.to_string(),
            breed: profile_field(input.breed),
            age: profile_field(input.age),
            colour: profile_field(input.colour),
            records: RecordSet::default(),
        })
    }

    /// Apply the profile rules to a horse read from stored or imported data.
    ///
    /// Blank profile fields become [`NOT_SPECIFIED`]; a blank name is rejected.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        for field in [&mut self.breed, &mut self.age, &mut self.colour] {
            if field.trim().is_empty() {
                *field = not_specified();
            }
        }
        Ok(self)
    }

    /// Total number of records across all kinds.
    pub fn record_count(&self) -> usize {
        RecordKind::ALL
            .iter()
            .map(|kind| self.records.len(*kind))
            .sum()
    }
}

fn profile_field(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => not_specified(),
    }
}

/// One ordered collection per record kind, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordSet {
    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    #[serde(default)]
    pub deworming: Vec<Deworming>,
    #[serde(default)]
    pub farrier: Vec<FarrierVisit>,
    #[serde(default)]
    pub veterinary: Vec<VeterinaryVisit>,
}

impl RecordSet {
    /// Number of records of one kind.
    pub fn len(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Vaccinations => self.vaccinations.len(),
            RecordKind::Deworming => self.deworming.len(),
            RecordKind::Farrier => self.farrier.len(),
            RecordKind::Veterinary => self.veterinary.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        RecordKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// Append a record to the collection matching its kind.
    pub fn push(&mut self, record: HealthRecord) {
        match record {
            HealthRecord::Vaccination(r) => self.vaccinations.push(r),
            HealthRecord::Deworming(r) => self.deworming.push(r),
            HealthRecord::Farrier(r) => self.farrier.push(r),
            HealthRecord::Veterinary(r) => self.veterinary.push(r),
        }
    }

    /// Remove the record at a storage index, if it exists.
    pub fn remove(&mut self, kind: RecordKind, index: usize) -> Option<HealthRecord> {
        if index >= self.len(kind) {
            return None;
        }
        Some(match kind {
            RecordKind::Vaccinations => self.vaccinations.remove(index).into(),
            RecordKind::Deworming => self.deworming.remove(index).into(),
            RecordKind::Farrier => self.farrier.remove(index).into(),
            RecordKind::Veterinary => self.veterinary.remove(index).into(),
        })
    }

    /// Records of one kind in storage order.
    pub fn records(&self, kind: RecordKind) -> Vec<HealthRecord> {
        match kind {
            RecordKind::Vaccinations => self.vaccinations.iter().cloned().map(Into::into).collect(),
            RecordKind::Deworming => self.deworming.iter().cloned().map(Into::into).collect(),
            RecordKind::Farrier => self.farrier.iter().cloned().map(Into::into).collect(),
            RecordKind::Veterinary => self.veterinary.iter().cloned().map(Into::into).collect(),
        }
    }

    /// Every record, kinds in enumeration order, each in storage order.
    pub fn all_records(&self) -> Vec<HealthRecord> {
        RecordKind::ALL
            .iter()
            .flat_map(|kind| self.records(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn vaccination(kind: &str, date: &str) -> HealthRecord {
        Vaccination {
            vaccine_type: kind.into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            next_due: None,
            veterinarian: String::new(),
            notes: String::new(),
        }
        .into()
    }

    #[test]
    fn test_new_horse() {
        let horse = Horse::new(NewHorse::named("Bella")).unwrap();
        assert_eq!(horse.name, "Bella");
        assert_eq!(horse.breed, NOT_SPECIFIED);
        assert_eq!(horse.age, NOT_SPECIFIED);
        assert_eq!(horse.colour, NOT_SPECIFIED);
        assert!(horse.records.is_empty());
        assert_eq!(horse.record_count(), 0);
    }

    #[test]
    fn test_new_horse_requires_name() {
        assert_eq!(
            Horse::new(NewHorse::named("   ")),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_blank_profile_fields_use_sentinel() {
        let horse = Horse::new(NewHorse {
            name: "Storm".into(),
            breed: Some("Waler".into()),
            age: Some("  ".into()),
            colour: None,
        })
        .unwrap();
        assert_eq!(horse.breed, "Waler");
        assert_eq!(horse.age, NOT_SPECIFIED);
        assert_eq!(horse.colour, NOT_SPECIFIED);
    }

    #[test]
    fn test_new_horse_serializes_all_collections() {
        let horse = Horse::new(NewHorse::named("Bella")).unwrap();
        let json = serde_json::to_value(&horse).unwrap();
        for kind in RecordKind::ALL {
            assert_eq!(json["records"][kind.key()], serde_json::json!([]));
        }
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let horse: Horse = serde_json::from_str(r#"{"name": "Bella", "records": {}}"#).unwrap();
        assert!(horse.records.is_empty());
        assert_eq!(horse.breed, NOT_SPECIFIED);

        let horse: Horse = serde_json::from_str(r#"{"name": "Bella"}"#).unwrap();
        assert!(horse.records.is_empty());
    }

    #[test]
    fn test_normalized_fills_blank_profile_fields() {
        let horse: Horse = serde_json::from_str(
            r#"{"name": "Bella", "breed": "", "age": 7, "colour": null}"#,
        )
        .unwrap();
        let horse = horse.normalized().unwrap();
        assert_eq!(horse.breed, NOT_SPECIFIED);
        assert_eq!(horse.age, "7");
        assert_eq!(horse.colour, NOT_SPECIFIED);

        let unnamed: Horse = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        assert_eq!(unnamed.normalized(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_push_and_remove() {
        let mut records = RecordSet::default();
        records.push(vaccination("Tetanus", "2024-01-01"));
        records.push(vaccination("Strangles", "2024-02-01"));
        assert_eq!(records.len(RecordKind::Vaccinations), 2);
        assert_eq!(records.len(RecordKind::Farrier), 0);

        let removed = records.remove(RecordKind::Vaccinations, 0).unwrap();
        assert_eq!(removed.category(), "Tetanus");
        assert_eq!(records.vaccinations[0].vaccine_type, "Strangles");
        assert!(records.remove(RecordKind::Vaccinations, 5).is_none());
    }
}
