//! Lenient decoding of list responses.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode a list response, degrading instead of failing.
///
/// A body that is not a JSON array yields an empty list. Elements that do not
/// decode as `T` are skipped. Both cases are logged.
pub fn decode_list<T: DeserializeOwned>(body: Value, what: &str) -> Vec<T> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            warn!(kind = what, found = %value_kind(&other), "expected a JSON array, using empty list");
            return Vec::new();
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(kind = what, index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();

    if decoded.len() != total {
        warn!(
            kind = what,
            kept = decoded.len(),
            total,
            "some records were dropped while decoding"
        );
    }

    decoded
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deal, Stage};
    use serde_json::json;

    #[test]
    fn test_non_array_is_empty() {
        let deals: Vec<Deal> = decode_list(json!({"error": "upstream timeout"}), "deals");
        assert!(deals.is_empty());

        let stages: Vec<Stage> = decode_list(Value::Null, "stages");
        assert!(stages.is_empty());
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let stages: Vec<Stage> = decode_list(
            json!([
                {"id": "new", "name": "New", "order": 0},
                {"name": "missing id"},
                {"id": "offer", "name": "Offer", "order": 1, "client_type": "landlord"},
                {"id": "closing", "name": "Closing", "order": 2}
            ]),
            "stages",
        );

        let ids: Vec<&str> = stages.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "closing"]);
    }

    #[test]
    fn test_array_of_deals() {
        let deals: Vec<Deal> = decode_list(
            json!([{"id": "d1", "stage": "new", "title": "Elm", "price": 300000}]),
            "deals",
        );
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].price, Some(300_000.0));
    }

    #[test]
    fn test_non_finite_price_drops_record_and_keeps_totals_finite() {
        let deals: Vec<Deal> = decode_list(
            json!([
                {"id": "a", "stage": "new", "price": "NaN"},
                {"id": "b", "stage": "new", "price": 100},
                {"id": "c", "stage": "new", "price": "inf"}
            ]),
            "deals",
        );

        let ids: Vec<&str> = deals.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        let totals = crate::board::Totals::of(&deals);
        assert_eq!(totals.value, 100.0);
    }
}
