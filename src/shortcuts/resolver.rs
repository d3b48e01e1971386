//! Normalizes a raw persisted configuration value into an `ActivationGesture`.
//!
//! Resolution is total: any value, however malformed, produces a valid
//! gesture. Absent or non-object values yield the default (Ctrl+Q).

use serde_json::Value;

use super::types::{normalize_key_char, ActivationGesture};
use crate::config::DEFAULT_SHORTCUT_KEY;

/// Resolve a raw configuration value into a well-formed gesture.
///
/// - Non-objects (null, numbers, strings, booleans) resolve to the default.
/// - Arrays are treated as objects with no fields: all modifiers off, default key.
/// - Modifier fields use truthiness (`0`, `""`, `null`, `false` are false).
/// - `key` must be a string that is non-empty after trimming; its first
///   lowercased character is used. Anything else falls back to the default key.
pub fn resolve(raw: &Value) -> ActivationGesture {
    let fields = match raw {
        Value::Object(map) => Some(map),
        Value::Array(_) => None,
        _ => return ActivationGesture::default(),
    };

    let field = |name: &str| fields.and_then(|map| map.get(name));
    let flag = |name: &str| field(name).map(is_truthy).unwrap_or(false);

    let key = field("key")
        .and_then(Value::as_str)
        .map(str::trim)
        .and_then(|trimmed| trimmed.chars().next())
        .map(normalize_key_char)
        .unwrap_or(DEFAULT_SHORTCUT_KEY);

    ActivationGesture {
        ctrl: flag("ctrl"),
        alt: flag("alt"),
        shift: flag("shift"),
        meta: flag("meta"),
        key,
    }
}

/// Resolve an optional value; `None` (absent key) resolves to the default.
pub fn resolve_optional(raw: Option<&Value>) -> ActivationGesture {
    raw.map(resolve).unwrap_or_default()
}

/// Truthiness of a stored JSON value, as a script reading it would see it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
