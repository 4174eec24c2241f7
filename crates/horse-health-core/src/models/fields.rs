//! Field codecs shared by the record models.
//!
//! The persisted format is the one earlier browser builds wrote: an empty
//! string stands for "no due date" and numbers often arrive as strings.

use chrono::NaiveDate;

/// Storage format for all dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format for dates (en-AU).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), ISO_DATE_FORMAT).ok()
}

/// Format a date for display, e.g. `01/06/2024`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parse a numeric form value; anything unparsable is 0.
pub fn parse_amount(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Serde codec for `Option<NaiveDate>` where `""` and `null` mean `None`.
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::ISO_DATE_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(ISO_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", text, e))),
        }
    }
}

/// Serde codec for numbers that may be stored as JSON numbers or strings.
///
/// Any other JSON value reads as 0.
pub mod lenient_number {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number
                .as_f64()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0),
            Value::String(text) => super::parse_amount(&text),
            _ => 0.0,
        })
    }
}

/// Serde codec for text fields that older data may hold as numbers or `null`.
///
/// Scalars become their text form; `null`, arrays and objects read as empty.
pub mod lenient_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
        })
    }
}
