//! Normalization of server-side script bodies.
//!
//! Stored procedures, triggers and user defined functions carry their
//! source text in `body`. Callers may instead supply it as `serverScript`,
//! and either field may hold a non-string JSON value; both are sent as text.

use serde_json::Value;

/// Field callers may use instead of `body` to supply script source.
pub const SERVER_SCRIPT_FIELD: &str = "serverScript";

fn as_script_text(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(text),
        other => Value::String(other.to_string()),
    }
}

/// Rewrites a script resource so that `body` holds the script as a string.
///
/// A truthy `serverScript` replaces `body` and is removed from the resource.
/// Otherwise an existing non-string `body` is converted to its JSON text.
/// Non-object values are left untouched.
///
/// ```rust
/// use documentdb_client::resources::normalize_script_body;
/// use serde_json::json;
///
/// let mut sproc = json!({"id": "sp1", "serverScript": "function () {}"});
/// normalize_script_body(&mut sproc);
/// assert_eq!(sproc, json!({"id": "sp1", "body": "function () {}"}));
/// ```
pub fn normalize_script_body(resource: &mut Value) {
    let Some(object) = resource.as_object_mut() else {
        return;
    };

    match object.remove(SERVER_SCRIPT_FIELD) {
        Some(script) if is_truthy(&script) => {
            object.insert("body".to_string(), as_script_text(script));
        }
        _ => {
            if let Some(body) = object.remove("body") {
                let body = if is_truthy(&body) { as_script_text(body) } else { body };
                object.insert("body".to_string(), body);
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
