//! Data records and slot text extraction.

use serde_json::Value;

/// An opaque key-value record. Only the aliased fields are ever read.
pub type Record = serde_json::Map<String, Value>;

/// The text a record contributes to a slot backed by `field`.
///
/// Strings are used verbatim, numbers and booleans through their display
/// form, objects and arrays as compact JSON. A null or missing field yields
/// the empty string.
pub fn field_text(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(value @ (Value::Array(_) | Value::Object(_))) => value.to_string(),
        Some(Value::Null) | None => {
            tracing::debug!(target: "input_dropdown::render", field, "record has no value for aliased field");
            String::new()
        }
    }
}

/// Build a record from `(field, value)` pairs.
///
/// # Example
///
/// ```
/// use input_dropdown::record::{field_text, record};
///
/// let alice = record([("text1", "Alice"), ("text2", "Admin")]);
/// assert_eq!(field_text(&alice, "text1"), "Alice");
/// ```
pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fields
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
