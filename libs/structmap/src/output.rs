use crate::value::{MappedStruct, Value};

/// Render a mapped record as a JSON object.
pub fn to_json(map: &MappedStruct) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect(),
    )
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(v) => serde_json::Value::from(*v),
        Value::Uint(v) => serde_json::Value::from(*v),
        // NaN and infinities have no JSON form and become null.
        Value::Float(v) => serde_json::Value::from(*v),
        Value::Complex(c) => serde_json::json!({ "re": c.re, "im": c.im }),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(l) => serde_json::Value::Array(l.iter().map(value_to_json).collect()),
        Value::Map(m) => to_json(m),
    }
}

/// Flatten a mapped record into `(key, value)` string pairs for a query
/// string.
///
/// - `Null` values are skipped
/// - lists yield one pair per element under the same key
/// - nested maps are flattened with dotted keys
pub fn query_pairs(map: &MappedStruct) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in map {
        push_pairs(&mut pairs, key, value);
    }
    pairs
}

fn push_pairs(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::List(items) => {
            for item in items {
                push_pairs(pairs, key, item);
            }
        }
        Value::Map(m) => {
            for (k, v) in m {
                push_pairs(pairs, &format!("{key}.{k}"), v);
            }
        }
        scalar => pairs.push((key.to_string(), scalar.to_string())),
    }
}
