//! Structural checks on a raw `Unit` response.

use serde_json::Value;

use crate::error::LightspeedError;
use crate::types::{RawResponse, RawUnitRecord};

/// Validates a raw response and splits it into unit records.
///
/// Only the outer shape is checked here: a 2xx status and a non-empty JSON
/// array. Array elements that are not objects become empty records, which
/// normalization then rejects for missing fields.
///
/// # Errors
///
/// - [`LightspeedError::UnexpectedStatus`] for any non-2xx status.
/// - [`LightspeedError::Deserialize`] if the body is not JSON.
/// - [`LightspeedError::NotAnArray`] if the top-level value is not an array.
/// - [`LightspeedError::EmptyPayload`] if the array has no elements.
pub fn validate_response(response: &RawResponse) -> Result<Vec<RawUnitRecord>, LightspeedError> {
    if !(200..300).contains(&response.status) {
        return Err(LightspeedError::UnexpectedStatus {
            status: response.status,
            url: response.url.clone(),
        });
    }

    let value: Value =
        serde_json::from_str(&response.body).map_err(|e| LightspeedError::Deserialize {
            context: format!("unit list from {}", response.url),
            source: e,
        })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LightspeedError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    if items.is_empty() {
        return Err(LightspeedError::EmptyPayload);
    }

    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => RawUnitRecord::from(map),
            other => {
                tracing::warn!(kind = json_kind(&other), "unit list element is not an object");
                RawUnitRecord::default()
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
