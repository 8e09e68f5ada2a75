use serde_json::Value;

/// Renders a scalar json value the way it would be shown to a user: strings
/// without quotes, `None` for null.  Arrays and objects keep their json text.
pub fn json_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(if b {
            "true".to_string()
        } else {
            "false".to_string()
        }),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
