//! Activation gesture type with matching and platform-neutral display.
//!
//! This module provides:
//! - `ActivationGesture` - the modifier+key combination that toggles the overlay
//! - Matching against a `KeyEvent` coming from the host page
//! - Human-readable display (Ctrl+Shift+Q)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{DEFAULT_SHORTCUT_CTRL, DEFAULT_SHORTCUT_KEY};
use crate::dispatcher::KeyEvent;

/// The modifier+key combination that opens and closes the overlay.
///
/// Serialized with the persisted shape `{ ctrl, alt, shift, meta, key }`.
/// `key` is always a single lowercased character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivationGesture {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
    pub key: char,
}

impl Default for ActivationGesture {
    /// Ctrl+Q
    fn default() -> Self {
        Self {
            ctrl: DEFAULT_SHORTCUT_CTRL,
            alt: false,
            shift: false,
            meta: false,
            key: DEFAULT_SHORTCUT_KEY,
        }
    }
}

impl ActivationGesture {
    pub fn new(key: char) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key: normalize_key_char(key),
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Exact match: every modifier flag must agree and the lowercased event
    /// key must equal the gesture key.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.ctrl == self.ctrl
            && event.alt == self.alt
            && event.shift == self.shift
            && event.meta == self.meta
            && single_char(&event.normalized_key()) == Some(self.key)
    }

    /// Persisted JSON shape of this gesture.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "ctrl": self.ctrl,
            "alt": self.alt,
            "shift": self.shift,
            "meta": self.meta,
            "key": self.key.to_string(),
        })
    }

    pub fn display(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.meta {
            parts.push("Meta".to_string());
        }
        parts.push(self.key.to_uppercase().collect());
        parts.join("+")
    }
}

impl fmt::Display for ActivationGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Lowercase a key character, keeping only the first char when lowercasing
/// expands it.
pub fn normalize_key_char(key: char) -> char {
    key.to_lowercase().next().unwrap_or(key)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
