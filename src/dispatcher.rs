//! Keyboard dispatcher.
//!
//! The host registers one capturing keydown listener at the document level
//! and forwards every event to `OverlayController::handle_key_event`, which
//! returns whether the event was consumed (the host then prevents default).
//!
//! Priority per keystroke, only when the host page has not already prevented
//! the event:
//! 1. Session open + `escape` → close.
//! 2. Session open + focus outside a typing field + key in the shortcut
//!    alphabet indexing a live target → execute it.
//! 3. Exact activation gesture match → toggle the session.
//!
//! Typing-field suppression applies only to step 2.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::controller::OverlayController;
use crate::host::{EventTarget, HostSurface};
use crate::shortcuts::{index_of, ActivationGesture};

/// A keydown event as seen by the capturing listener.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// DOM `key` value, e.g. `"q"`, `"Q"`, `"Escape"`, `"Enter"`.
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
    /// Already handled by a host page listener.
    #[serde(default)]
    pub default_prevented: bool,
    #[serde(default = "EventTarget::body")]
    pub target: EventTarget,
}

/// Errors parsing a key description such as `ctrl+shift+q`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("key description is empty")]
    Empty,
    #[error("key description has no key, only modifiers")]
    MissingKey,
    #[error("unexpected token '{0}' in key description")]
    UnknownToken(String),
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target: EventTarget::body(),
            ..Default::default()
        }
    }

    pub fn escape() -> Self {
        Self::new("Escape")
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

    pub fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }

    pub fn on_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    /// The key an activation gesture would produce.
    pub fn for_gesture(gesture: &ActivationGesture) -> Self {
        Self {
            key: gesture.key.to_string(),
            ctrl: gesture.ctrl,
            alt: gesture.alt,
            shift: gesture.shift,
            meta: gesture.meta,
            default_prevented: false,
            target: EventTarget::body(),
        }
    }

    pub fn normalized_key(&self) -> String {
        self.key.to_lowercase()
    }

    /// Parse `ctrl+alt+shift+meta+<key>`. Named keys are passed through
    /// (`esc` is accepted for `Escape`).
    pub fn parse(s: &str) -> Result<Self, KeyParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }

        let mut event = Self::new("");
        let mut key_part: Option<&str> = None;

        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => event.ctrl = true,
                "alt" | "option" | "opt" => event.alt = true,
                "shift" => event.shift = true,
                "meta" | "cmd" | "command" | "super" => event.meta = true,
                _ => {
                    if key_part.is_some() {
                        return Err(KeyParseError::UnknownToken(part.to_string()));
                    }
                    key_part = Some(part);
                }
            }
        }

        let key = key_part.ok_or(KeyParseError::MissingKey)?;
        event.key = match key.to_lowercase().as_str() {
            "esc" | "escape" => "Escape".to_string(),
            "enter" | "return" => "Enter".to_string(),
            "space" => " ".to_string(),
            _ => key.to_string(),
        };
        Ok(event)
    }
}

/// What the dispatcher decided to do with one keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    CloseSession,
    Execute(usize),
    ToggleSession,
    Passthrough,
}

/// Whether the host should prevent the event's default behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    Handled,
    Passthrough,
}

impl KeyDisposition {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

/// Route one keystroke. `open_targets` is the live target count of the open
/// session, or `None` when closed.
pub fn classify(
    event: &KeyEvent,
    open_targets: Option<usize>,
    gesture: &ActivationGesture,
) -> KeyAction {
    if event.default_prevented {
        return KeyAction::Passthrough;
    }

    if let Some(count) = open_targets {
        let key = event.normalized_key();
        if key == "escape" {
            return KeyAction::CloseSession;
        }

        if !event.target.is_typing_field() {
            if let Some(index) = index_of(&key).filter(|&i| i < count) {
                return KeyAction::Execute(index);
            }
        }
    }

    if gesture.matches(event) {
        return KeyAction::ToggleSession;
    }

    KeyAction::Passthrough
}

impl<H: HostSurface> OverlayController<H> {
    /// Single top-level key handler. `Handled` means the host must prevent
    /// the event's default.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> KeyDisposition {
        let open_targets = self.session().map(|s| s.targets().len());
        let action = classify(event, open_targets, &self.gesture());

        debug!(
            event_type = "key_event",
            key = %event.key,
            action = ?action,
            "Dispatched key"
        );

        match action {
            KeyAction::CloseSession => self.close(),
            KeyAction::Execute(index) => {
                self.execute(index);
            }
            KeyAction::ToggleSession => self.toggle(),
            KeyAction::Passthrough => return KeyDisposition::Passthrough,
        }
        KeyDisposition::Handled
    }
}
