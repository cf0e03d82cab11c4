// Trading abbreviations agents tend to use, mapped to the API's enum values.
//
// Normalization runs before argument validation and never fails: anything it
// does not recognize is passed through untouched so validation can report it.

use serde_json::Value;

/// Abbreviation -> canonical value for a single field
pub type AliasTable = &'static [(&'static str, &'static str)];

pub const DURATION_ALIASES: AliasTable = &[
    ("GTC", "GOOD_TILL_CANCEL"),
    ("FOK", "FILL_OR_KILL"),
    ("IOC", "IMMEDIATE_OR_CANCEL"),
];

pub const ORDER_TYPE_ALIASES: AliasTable = &[
    ("MKT", "MARKET"),
    ("LMT", "LIMIT"),
    ("STP", "STOP"),
    ("STP_LMT", "STOP_LIMIT"),
];

pub const INSTRUCTION_ALIASES: AliasTable = &[
    ("BTO", "BUY_TO_OPEN"),
    ("BTC", "BUY_TO_CLOSE"),
    ("STO", "SELL_TO_OPEN"),
    ("STC", "SELL_TO_CLOSE"),
];

/// Abbreviations accepted by the order tools, for tool descriptions
pub fn accepted_abbreviations() -> Vec<&'static str> {
    DURATION_ALIASES
        .iter()
        .chain(ORDER_TYPE_ALIASES)
        .chain(INSTRUCTION_ALIASES)
        .map(|(alias, _)| *alias)
        .collect()
}

fn lookup(table: AliasTable, alias: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == alias)
        .map(|(_, to)| *to)
}

/// Replace a string value found in `table` with its canonical form.
/// Any other value is returned unchanged.
pub fn normalize(value: Value, table: AliasTable) -> Value {
    match value {
        Value::String(s) => match lookup(table, &s) {
            Some(canonical) => Value::String(canonical.to_string()),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Normalize `instruction` on every leg of an order leg list.
/// Non-array input and non-object legs are left alone.
pub fn normalize_order_legs(legs: Value) -> Value {
    match legs {
        Value::Array(legs) => Value::Array(
            legs.into_iter()
                .map(|leg| match leg {
                    Value::Object(mut fields) => {
                        if let Some(instruction) = fields.get_mut("instruction") {
                            *instruction = normalize(instruction.take(), INSTRUCTION_ALIASES);
                        }
                        Value::Object(fields)
                    }
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Normalize the aliasable fields of a placeOrder / replaceOrder argument object
pub fn normalize_order_arguments(arguments: Value) -> Value {
    let Value::Object(mut fields) = arguments else {
        return arguments;
    };

    if let Some(duration) = fields.get_mut("duration") {
        *duration = normalize(duration.take(), DURATION_ALIASES);
    }
    if let Some(order_type) = fields.get_mut("orderType") {
        *order_type = normalize(order_type.take(), ORDER_TYPE_ALIASES);
    }
    if let Some(legs) = fields.get_mut("orderLegCollection") {
        *legs = normalize_order_legs(legs.take());
    }

    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_alias_is_rewritten() {
        assert_eq!(normalize(json!("GTC"), DURATION_ALIASES), json!("GOOD_TILL_CANCEL"));
        assert_eq!(normalize(json!("STP_LMT"), ORDER_TYPE_ALIASES), json!("STOP_LIMIT"));
    }

    #[test]
    fn test_canonical_value_is_unchanged() {
        assert_eq!(normalize(json!("LIMIT"), ORDER_TYPE_ALIASES), json!("LIMIT"));
    }

    #[test]
    fn test_unknown_and_non_string_pass_through() {
        assert_eq!(normalize(json!("XYZ"), DURATION_ALIASES), json!("XYZ"));
        assert_eq!(normalize(json!(42), DURATION_ALIASES), json!(42));
        assert_eq!(normalize(Value::Null, DURATION_ALIASES), Value::Null);
        // Aliases are not shared across fields
        assert_eq!(normalize(json!("GTC"), ORDER_TYPE_ALIASES), json!("GTC"));
    }

    #[test]
    fn test_order_legs_only_touch_instruction() {
        let legs = json!([
            {"instruction": "BTO", "quantity": 1, "instrument": {"symbol": "BTC"}},
            {"instruction": "SELL_TO_CLOSE", "quantity": 2},
            "not-a-leg",
            null,
            {"quantity": 3},
            {"instruction": 7}
        ]);

        assert_eq!(
            normalize_order_legs(legs),
            json!([
                {"instruction": "BUY_TO_OPEN", "quantity": 1, "instrument": {"symbol": "BTC"}},
                {"instruction": "SELL_TO_CLOSE", "quantity": 2},
                "not-a-leg",
                null,
                {"quantity": 3},
                {"instruction": 7}
            ])
        );
    }

    #[test]
    fn test_non_array_legs_untouched() {
        assert_eq!(normalize_order_legs(json!("BTO")), json!("BTO"));
    }

    #[test]
    fn test_order_arguments() {
        let args = json!({
            "accountNumber": "123",
            "orderType": "LMT",
            "duration": "GTC",
            "session": "NORMAL",
            "orderLegCollection": [{"instruction": "STO", "quantity": 1}]
        });

        let normalized = normalize_order_arguments(args);
        assert_eq!(normalized["orderType"], "LIMIT");
        assert_eq!(normalized["duration"], "GOOD_TILL_CANCEL");
        assert_eq!(normalized["session"], "NORMAL");
        assert_eq!(normalized["orderLegCollection"][0]["instruction"], "SELL_TO_OPEN");
        assert!(normalize_order_arguments(json!("x")).is_string());
    }

    #[test]
    fn test_accepted_abbreviations() {
        let all = accepted_abbreviations();
        assert_eq!(all.len(), 11);
        assert!(all.contains(&"STP_LMT"));
    }
}
