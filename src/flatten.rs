//! Record flattening
//!
//! Each source payload wraps its records in a `results` array. Flattening
//! concatenates every payload's records into one flat list, preserving
//! payload order and within-payload order.

use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Flatten a sequence of `{ "results": [...] }` payloads into one record list.
///
/// A payload without a `results` key is a `MissingField` error; a `results`
/// that is not an array is a `Payload` error. Both propagate; there is no
/// partial output.
pub fn flatten_payloads(payloads: &[JsonValue]) -> Result<Vec<JsonValue>> {
    let mut records = Vec::new();

    for payload in payloads {
        let results = payload
            .get("results")
            .ok_or_else(|| Error::missing_field("results"))?;

        let items = results.as_array().ok_or_else(|| {
            Error::payload(format!(
                "expected 'results' to be an array, got {}",
                type_name(results)
            ))
        })?;

        records.extend(items.iter().cloned());
    }

    Ok(records)
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
