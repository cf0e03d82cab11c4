// Option chain slimming.
//
// Full chains easily exceed MCP response size limits, so only the fields an
// agent needs to reason about a trade are kept.

use serde_json::{Map, Value};

/// Top-level chain fields carried over as-is
pub const CHAIN_FIELDS: [&str; 7] = [
    "symbol",
    "status",
    "isDelayed",
    "isIndex",
    "underlyingPrice",
    "volatility",
    "underlying",
];

/// Per-contract fields carried over
pub const CONTRACT_FIELDS: [&str; 19] = [
    "symbol",
    "putCall",
    "strikePrice",
    "expirationDate",
    "daysToExpiration",
    "bidPrice",
    "askPrice",
    "lastPrice",
    "markPrice",
    "totalVolume",
    "openInterest",
    "delta",
    "gamma",
    "theta",
    "vega",
    "volatility",
    "intrinsicValue",
    "timeValue",
    "isInTheMoney",
];

const EXP_DATE_MAPS: [&str; 2] = ["callExpDateMap", "putExpDateMap"];

/// Keep only the allow-listed fields of a contract. Missing fields stay missing.
pub fn slim_contract(contract: &Value) -> Value {
    let mut slim = Map::new();
    if let Value::Object(fields) = contract {
        for key in CONTRACT_FIELDS {
            if let Some(value) = fields.get(key) {
                slim.insert(key.to_string(), value.clone());
            }
        }
    }
    Value::Object(slim)
}

/// Rebuild an expiration map (expiration -> strike -> contracts).
/// `None` when the map is missing or null.
pub fn slim_exp_date_map(exp_date_map: Option<&Value>) -> Option<Value> {
    let exp_date_map = match exp_date_map {
        None | Some(Value::Null) => return None,
        Some(map) => map,
    };

    let mut result = Map::new();
    if let Value::Object(expirations) = exp_date_map {
        for (exp_date, strikes) in expirations {
            let mut slim_strikes = Map::new();
            if let Value::Object(strikes) = strikes {
                for (strike, contracts) in strikes {
                    let contracts = match contracts {
                        Value::Array(contracts) => contracts.iter().map(slim_contract).collect(),
                        _ => Vec::new(),
                    };
                    slim_strikes.insert(strike.clone(), Value::Array(contracts));
                }
            }
            result.insert(exp_date.clone(), Value::Object(slim_strikes));
        }
    }
    Some(Value::Object(result))
}

/// Reduce a full option chain response to the essential fields
pub fn slim_option_chain(chain: &Value) -> Value {
    let mut slim = Map::new();

    for key in CHAIN_FIELDS {
        if let Some(value) = chain.get(key) {
            slim.insert(key.to_string(), value.clone());
        }
    }

    for key in EXP_DATE_MAPS {
        if let Some(map) = slim_exp_date_map(chain.get(key)) {
            slim.insert(key.to_string(), map);
        }
    }

    Value::Object(slim)
}
