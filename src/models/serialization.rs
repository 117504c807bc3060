//! Serde helpers for the backend's loose encoding of optional values.
//!
//! The backend writes an absent string or date as either `null` or `""`, and
//! sometimes sends numbers as strings. These helpers decode all of those into
//! `Option<T>` so the model never carries a sentinel for "absent".

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decode `null`, `""` or whitespace-only strings as `None`.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Decode a number that may arrive as a JSON number, a numeric string, `""`
/// or `null`. `NaN` and infinities are rejected.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(de::Error::custom(format!("invalid number: {s:?}"))),
        },
        Some(other) => Err(de::Error::custom(format!(
            "expected a number, found {other}"
        ))),
    }
}

/// Optional calendar dates.
///
/// Accepts `null`, `""`, `"2024-05-01"` and datetime strings whose first ten
/// characters are a date (`"2024-05-01 00:00:00.000Z"`).
pub mod optional_date {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = blank_as_none(deserializer)? else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid date {raw:?}: {e}")))
    }
}

/// Render an optional date the way the persist endpoint expects: `""` when
/// absent.
pub fn date_or_empty(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
