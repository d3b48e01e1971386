//! Control surface: shortcut settings form and the page-highlight button.
//!
//! Holds the visible state of the settings panel (form fields, busy flags,
//! status lines) and performs its two I/O edges: the configuration store and
//! cross-context messaging. Failures are shown as status messages; nothing is
//! retried and nothing partial is committed.

use thiserror::Error;
use tracing::{error, info};

use crate::config::{ConfigStore, StoreChange, StoreError, SHORTCUT_STORAGE_KEY};
use crate::messaging::{MessagingError, RuntimeMessage, TabMessenger};
use crate::shortcuts::{is_truthy, resolve, resolve_optional, ActivationGesture};

/// One line of status text. Errors are rendered in red.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    fn set(&mut self, text: &str, is_error: bool) {
        self.text = text.to_string();
        self.is_error = is_error;
    }
}

/// Validation and save failures from the shortcut form.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Please enter a shortcut key.")]
    EmptyKey,
    #[error("Use a letter or digit for the key.")]
    InvalidKey,
    #[error("Failed to save shortcut.")]
    Save(#[source] StoreError),
}

/// Raw form fields as the user edits them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortcutForm {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl ShortcutForm {
    pub fn from_gesture(gesture: &ActivationGesture) -> Self {
        Self {
            key: gesture.key.to_uppercase().collect(),
            ctrl: gesture.ctrl,
            alt: gesture.alt,
            shift: gesture.shift,
            meta: gesture.meta,
        }
    }

    /// Validate into a gesture. The key is trimmed, lowercased and truncated
    /// to one character, which must be an ASCII letter or digit.
    pub fn to_gesture(&self) -> Result<ActivationGesture, FormError> {
        let trimmed = self.key.trim();
        if trimmed.is_empty() {
            return Err(FormError::EmptyKey);
        }

        let key = trimmed
            .to_lowercase()
            .chars()
            .next()
            .ok_or(FormError::EmptyKey)?;
        if !(key.is_ascii_lowercase() || key.is_ascii_digit()) {
            return Err(FormError::InvalidKey);
        }

        Ok(ActivationGesture {
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
            meta: self.meta,
            key,
        })
    }
}

#[derive(Debug, Default)]
pub struct ControlPanel {
    pub form: ShortcutForm,
    pub status: StatusLine,
    pub shortcut_status: StatusLine,
    pub highlight_busy: bool,
    pub save_busy: bool,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_to_form(&mut self, gesture: &ActivationGesture) {
        self.form = ShortcutForm::from_gesture(gesture);
    }

    /// Populate the form from the store.
    pub fn load_shortcut<S: ConfigStore + ?Sized>(&mut self, store: &S) {
        match store.get(SHORTCUT_STORAGE_KEY) {
            Ok(stored) => {
                let gesture = resolve_optional(stored.as_ref());
                self.apply_to_form(&gesture);
                self.shortcut_status.set("Shortcut ready.", false);
            }
            Err(e) => {
                error!(error = %e, "Failed to load shortcut");
                self.apply_to_form(&ActivationGesture::default());
                self.shortcut_status.set("Failed to load shortcut.", true);
            }
        }
    }

    /// Validate and persist the form. The status line reflects the outcome.
    pub fn submit<S: ConfigStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<ActivationGesture, FormError> {
        let gesture = match self.form.to_gesture() {
            Ok(gesture) => gesture,
            Err(e) => {
                self.shortcut_status.set(&e.to_string(), true);
                return Err(e);
            }
        };

        self.save_busy = true;
        self.shortcut_status.set("Saving shortcut...", false);
        let result = store.set(SHORTCUT_STORAGE_KEY, gesture.to_value());
        self.save_busy = false;

        match result {
            Ok(()) => {
                info!(gesture = %gesture, "Shortcut saved");
                self.shortcut_status.set("Shortcut saved!", false);
                Ok(gesture)
            }
            Err(e) => {
                error!(error = %e, "Failed to save shortcut");
                let err = FormError::Save(e);
                self.shortcut_status.set(&err.to_string(), true);
                Err(err)
            }
        }
    }

    /// React to a store notification. Removals and falsy values are ignored.
    pub fn on_store_change(&mut self, change: &StoreChange) {
        if change.key != SHORTCUT_STORAGE_KEY {
            return;
        }
        if let Some(value) = change.new_value.as_ref().filter(|v| is_truthy(v)) {
            let gesture = resolve(value);
            self.apply_to_form(&gesture);
            self.shortcut_status.set("Shortcut updated.", false);
        }
    }

    /// Ask the active tab to toggle its page highlight.
    pub fn highlight_active_tab<M: TabMessenger + ?Sized>(
        &mut self,
        messenger: &mut M,
    ) -> Result<(), MessagingError> {
        self.highlight_busy = true;
        self.status.set("Highlighting...", false);

        let result = send_highlight(messenger);
        self.highlight_busy = false;

        match &result {
            Ok(true) => self.status.set("Toggled highlight!", false),
            Ok(false) => self.status.set("No active tab detected.", false),
            Err(e) => {
                error!(error = %e, "Failed to message content script");
                self.status.set("Failed to message content script.", true);
            }
        }
        result.map(|_| ())
    }
}

/// Returns `Ok(false)` when there is no active tab.
fn send_highlight<M: TabMessenger + ?Sized>(messenger: &mut M) -> Result<bool, MessagingError> {
    let Some(tab) = messenger.active_tab()? else {
        return Ok(false);
    };
    messenger.send(tab, &RuntimeMessage::Highlight)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::messaging::{MessageResponse, TabId};
    use serde_json::{json, Value};

    struct FailingStore;

    impl ConfigStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn subscribe(&self) -> async_channel::Receiver<StoreChange> {
            async_channel::unbounded().1
        }
    }

    #[derive(Default)]
    struct FakeMessenger {
        tab: Option<TabId>,
        fail: bool,
        sent: Vec<(TabId, RuntimeMessage)>,
    }

    impl TabMessenger for FakeMessenger {
        fn active_tab(&self) -> Result<Option<TabId>, MessagingError> {
            Ok(self.tab)
        }

        fn send(
            &mut self,
            tab: TabId,
            message: &RuntimeMessage,
        ) -> Result<MessageResponse, MessagingError> {
            if self.fail {
                return Err(MessagingError::NoReceiver);
            }
            self.sent.push((tab, message.clone()));
            Ok(MessageResponse { ok: true })
        }
    }

    fn form(key: &str) -> ShortcutForm {
        ShortcutForm {
            key: key.to_string(),
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn load_shows_stored_shortcut_uppercase() {
        let store = MemoryStore::with_value(SHORTCUT_STORAGE_KEY, json!({ "alt": true, "key": "k" }));
        let mut panel = ControlPanel::new();
        panel.load_shortcut(&store);
        assert_eq!(panel.form.key, "K");
        assert!(panel.form.alt);
        assert!(!panel.form.ctrl);
        assert_eq!(panel.shortcut_status.text, "Shortcut ready.");
        assert!(!panel.shortcut_status.is_error);
    }

    #[test]
    fn load_failure_shows_default_and_error() {
        let mut panel = ControlPanel::new();
        panel.load_shortcut(&FailingStore);
        assert_eq!(panel.form, ShortcutForm::from_gesture(&ActivationGesture::default()));
        assert_eq!(panel.shortcut_status.text, "Failed to load shortcut.");
        assert!(panel.shortcut_status.is_error);
    }

    #[test]
    fn submit_validates_key() {
        let store = MemoryStore::new();
        let mut panel = ControlPanel::new();

        panel.form = form("   ");
        assert!(matches!(panel.submit(&store), Err(FormError::EmptyKey)));
        assert_eq!(panel.shortcut_status.text, "Please enter a shortcut key.");
        assert!(panel.shortcut_status.is_error);

        panel.form = form("!");
        assert!(matches!(panel.submit(&store), Err(FormError::InvalidKey)));
        assert_eq!(panel.shortcut_status.text, "Use a letter or digit for the key.");

        assert_eq!(store.get(SHORTCUT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn submit_saves_normalized_gesture() {
        let store = MemoryStore::new();
        let rx = store.subscribe();
        let mut panel = ControlPanel::new();
        panel.form = form(" Jump ");

        let gesture = panel.submit(&store).unwrap();
        assert_eq!(gesture, ActivationGesture::new('j').with_ctrl());
        assert_eq!(panel.shortcut_status.text, "Shortcut saved!");
        assert!(!panel.save_busy);
        assert_eq!(
            store.get(SHORTCUT_STORAGE_KEY).unwrap(),
            Some(json!({ "ctrl": true, "alt": false, "shift": false, "meta": false, "key": "j" }))
        );
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn submit_reports_save_failure() {
        let mut panel = ControlPanel::new();
        panel.form = form("k");
        assert!(matches!(panel.submit(&FailingStore), Err(FormError::Save(_))));
        assert_eq!(panel.shortcut_status.text, "Failed to save shortcut.");
        assert!(panel.shortcut_status.is_error);
        assert!(!panel.save_busy);
    }

    #[test]
    fn store_change_refreshes_form() {
        let mut panel = ControlPanel::new();
        panel.on_store_change(&StoreChange {
            key: SHORTCUT_STORAGE_KEY.to_string(),
            old_value: None,
            new_value: Some(json!({ "meta": true, "key": "p" })),
        });
        assert_eq!(panel.form.key, "P");
        assert!(panel.form.meta);
        assert_eq!(panel.shortcut_status.text, "Shortcut updated.");

        let before = panel.form.clone();
        panel.on_store_change(&StoreChange {
            key: SHORTCUT_STORAGE_KEY.to_string(),
            old_value: Some(json!({ "key": "p" })),
            new_value: None,
        });
        panel.on_store_change(&StoreChange {
            key: "other".to_string(),
            old_value: None,
            new_value: Some(json!({ "key": "x" })),
        });
        for falsy in [Value::Null, json!(false), json!(0), json!("")] {
            panel.on_store_change(&StoreChange {
                key: SHORTCUT_STORAGE_KEY.to_string(),
                old_value: Some(json!({ "key": "p" })),
                new_value: Some(falsy),
            });
        }
        assert_eq!(panel.form, before);
    }

    #[test]
    fn highlight_reports_each_outcome() {
        let mut panel = ControlPanel::new();

        let mut no_tab = FakeMessenger::default();
        panel.highlight_active_tab(&mut no_tab).unwrap();
        assert_eq!(panel.status.text, "No active tab detected.");

        let mut ok = FakeMessenger {
            tab: Some(TabId(7)),
            ..Default::default()
        };
        panel.highlight_active_tab(&mut ok).unwrap();
        assert_eq!(panel.status.text, "Toggled highlight!");
        assert_eq!(ok.sent, vec![(TabId(7), RuntimeMessage::Highlight)]);

        let mut failing = FakeMessenger {
            tab: Some(TabId(7)),
            fail: true,
            ..Default::default()
        };
        assert_eq!(
            panel.highlight_active_tab(&mut failing),
            Err(MessagingError::NoReceiver)
        );
        assert_eq!(panel.status.text, "Failed to message content script.");
        assert!(panel.status.is_error);
        assert!(!panel.highlight_busy);
    }
}
