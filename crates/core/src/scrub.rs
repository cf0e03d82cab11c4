// Replace raw account identifiers in API responses with display labels

use serde_json::Value;
use std::collections::HashMap;

/// Raw account number or account hash -> non-sensitive label
pub type AccountDisplayMap = HashMap<String, String>;

/// Recursively replace every value that is a known account identifier.
///
/// Identifiers may appear as strings or, in order payloads, as numbers.
/// Keys and unmapped values are left as they are.
pub fn scrub_account_identifiers(value: Value, display_map: &AccountDisplayMap) -> Value {
    if display_map.is_empty() {
        return value;
    }
    scrub(value, display_map)
}

fn scrub(value: Value, display_map: &AccountDisplayMap) -> Value {
    match value {
        Value::String(s) => match display_map.get(&s) {
            Some(label) => Value::String(label.clone()),
            None => Value::String(s),
        },
        Value::Number(n) => match display_map.get(&n.to_string()) {
            Some(label) => Value::String(label.clone()),
            None => Value::Number(n),
        },
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| scrub(item, display_map))
                .collect(),
        ),
        Value::Object(mut fields) => {
            for field in fields.values_mut() {
                *field = scrub(field.take(), display_map);
            }
            Value::Object(fields)
        }
        other => other,
    }
}
