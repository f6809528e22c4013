//! Required-field checks for loosely typed JSON request bodies.

use serde_json::Value;

/// Names from `required` that are absent (or `null`) in `body`.
///
/// A non-object body is missing every field.
pub fn missing_fields(body: &Value, required: &[&'static str]) -> Vec<&'static str> {
    let obj = body.as_object();
    required
        .iter()
        .copied()
        .filter(|name| {
            obj.and_then(|o| o.get(*name))
                .map_or(true, Value::is_null)
        })
        .collect()
}
