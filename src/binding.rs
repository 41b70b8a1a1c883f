//! Variable bindings supplied by callers at render time.
//!
//! A binding maps a variable name to a JSON value: a string, number,
//! boolean, or a sequence of primitives/flat records. Bindings are per-call
//! input and are never stored by this crate.

use serde_json::Value;
use std::collections::BTreeMap;

/// Caller-supplied variable bindings for one render call.
pub type Bindings = BTreeMap<String, Value>;

/// Build a bindings map from key-value pairs.
///
/// ```
/// use promptloom::bindings;
///
/// let vars = bindings([("name", "Ada"), ("city", "London")]);
/// assert_eq!(vars.get("name").and_then(|v| v.as_str()), Some("Ada"));
/// ```
pub fn bindings<I, K, V>(pairs: I) -> Bindings
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Whether a bound value switches a conditional section on.
///
/// Truthy values: non-empty strings, non-zero numbers, `true`, and
/// non-empty sequences or records. Everything else is falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// String form of a bound value for interpolation.
///
/// Strings are inserted verbatim, numbers and booleans use their display
/// form, null is empty. Sequences and records fall back to compact JSON,
/// which keeps rendering total at the cost of a machine-flavored insert.
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
