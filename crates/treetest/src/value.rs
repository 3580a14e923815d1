//! Text rendering of dynamic argument values

use serde_json::Value;

/// Render a value the way it appears inside a generated test name.
///
/// Strings are written without quotes, arrays as their elements joined by
/// `,` (null elements are empty), objects as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => render(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
