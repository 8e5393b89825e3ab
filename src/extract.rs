//! Extraction of JSON payloads embedded in free-form model output.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::{ReviewError, Result};

// Greedy: first `{` through the last `}` anywhere after it.
static JSON_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{.*\}").expect("static regex is valid")
});

/// Returns the span from the first `{` to the last `}` in `text`.
///
/// The match is greedy across the whole text, so prose containing braces
/// around or between several objects yields one span covering all of them.
/// Returns `None` when no such span exists.
pub fn extract_json(text: &str) -> Option<&str> {
    JSON_SPAN.find(text).map(|m| m.as_str())
}

/// Extracts the embedded JSON object from `text` and returns the string
/// array stored under `field`.
///
/// A missing or non-array field yields an empty list rather than an error.
/// Non-string array elements are skipped.
pub fn string_list(text: &str, field: &str) -> Result<Vec<String>> {
    let json = extract_json(text).ok_or_else(|| {
        ReviewError::MalformedResponse("no JSON object found in model output".to_string())
    })?;

    let value: Value = serde_json::from_str(json).map_err(|e| {
        ReviewError::MalformedResponse(format!("embedded JSON does not parse: {}", e))
    })?;

    let Some(items) = value.get(field).and_then(Value::as_array) else {
        warn!("Model output has no '{}' array, using empty list", field);
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect())
}
