//! Raw API records.

use serde_json::{Map, Value};

/// An untyped record exactly as the API returned it.
pub type RawRecord = Map<String, Value>;

/// Renders a record field as text.
///
/// Strings are returned verbatim, numbers and booleans in their JSON spelling,
/// and missing or null fields as an empty string.
#[must_use]
pub fn field_text(record: &RawRecord, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
