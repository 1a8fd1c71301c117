//! Typed records for the console's entities, parsed from loosely-typed
//! host rows.
//!
//! The host is sloppy about JSON types: numeric ids arrive as numbers or
//! strings depending on the endpoint, and absent fields are omitted
//! rather than null. Row constructors coerce through the helpers below
//! and default missing fields to empty/zero.

mod course;
mod member;

pub use self::course::{Application, Completion, Course, DateSpan};
pub use self::member::Member;

use serde_json::Value;

/// Coerces a JSON value to i64, accepting numbers and numeric strings.
pub(crate) fn coerce_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Reads a field as a string, stringifying numbers; missing or
/// non-scalar fields become empty.
pub(crate) fn field_string(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Reads a field as i64 with coercion, defaulting to zero.
pub(crate) fn field_i64(row: &Value, key: &str) -> i64 {
    coerce_i64(row.get(key)).unwrap_or(0)
}
