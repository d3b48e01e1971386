//! Overlay controller.
//!
//! Owns the single optional `OverlaySession`, the last-resolved activation
//! gesture, and the injected host. All state changes happen through `&mut self`
//! from the host's event handlers; there is no ambient global state, so any
//! number of independent controllers can exist side by side.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ConfigStore, StoreChange, StoreError, SHORTCUT_STORAGE_KEY};
use crate::discovery::discover;
use crate::dispatcher::KeyDisposition;
use crate::highlight::HighlightPhase;
use crate::host::HostSurface;
use crate::overlay::{stylesheet, STYLESHEET_ID};
use crate::session::{OverlaySession, SessionId};
use crate::shortcuts::{resolve, resolve_optional, ActivationGesture};

pub struct OverlayController<H: HostSurface> {
    host: H,
    gesture: ActivationGesture,
    session: Option<OverlaySession>,
    next_session_id: u64,
    /// Session whose search field should take focus on the next frame.
    pending_focus: Option<SessionId>,
    config_changes: Option<async_channel::Receiver<StoreChange>>,
}

impl<H: HostSurface> OverlayController<H> {
    /// Install the stylesheet (once per page) and start closed with the
    /// default gesture.
    pub fn new(mut host: H) -> Self {
        host.install_stylesheet(STYLESHEET_ID, &stylesheet());
        Self {
            host,
            gesture: ActivationGesture::default(),
            session: None,
            next_session_id: 1,
            pending_focus: None,
            config_changes: None,
        }
    }

    pub fn with_gesture(mut self, gesture: ActivationGesture) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn gesture(&self) -> ActivationGesture {
        self.gesture
    }

    pub fn session(&self) -> Option<&OverlaySession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> HighlightPhase {
        match &self.session {
            Some(session) => HighlightPhase::Open {
                active: session.active(),
            },
            None => HighlightPhase::Closed,
        }
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

    /// Replace the gesture from a raw persisted value (malformed → default).
    pub fn apply_config(&mut self, raw: &Value) {
        self.set_gesture(resolve(raw));
    }

    fn set_gesture(&mut self, gesture: ActivationGesture) {
        if gesture != self.gesture {
            info!(
                event_type = "config_change",
                gesture = %gesture,
                previous = %self.gesture,
                "Activation gesture updated"
            );
        }
        self.gesture = gesture;
    }

    /// Read the stored gesture once and subscribe to later changes.
    ///
    /// The subscription is kept even when the read fails, so a later write
    /// still reaches this controller; the gesture stays at its current value.
    pub fn connect_config<S: ConfigStore + ?Sized>(&mut self, store: &S) -> Result<(), StoreError> {
        self.config_changes = Some(store.subscribe());
        match store.get(SHORTCUT_STORAGE_KEY) {
            Ok(stored) => {
                self.set_gesture(resolve_optional(stored.as_ref()));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored shortcut, keeping current gesture");
                Err(e)
            }
        }
    }

    /// Apply any pending store notifications without blocking.
    /// Returns how many shortcut changes were applied.
    pub fn pump_config_changes(&mut self) -> usize {
        let Some(rx) = self.config_changes.as_ref() else {
            return 0;
        };

        let mut latest: Option<Option<Value>> = None;
        let mut applied = 0;
        while let Ok(change) = rx.try_recv() {
            if change.key == SHORTCUT_STORAGE_KEY {
                latest = Some(change.new_value);
                applied += 1;
            }
        }

        if let Some(new_value) = latest {
            self.set_gesture(resolve_optional(new_value.as_ref()));
        }
        applied
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Discover targets and open a new session. Any existing session is
    /// closed first; an empty discovery leaves the overlay closed.
    pub fn open(&mut self) {
        self.close();

        let targets = discover(&self.host);
        if targets.is_empty() {
            debug!(event_type = "overlay", action = "open_skipped", "No targets on page");
            return;
        }

        let id = SessionId(self.next_session_id);
        self.next_session_id += 1;

        let target_count = targets.len();
        let session = OverlaySession::start(&mut self.host, id, targets);
        self.session = Some(session);

        self.pending_focus = Some(id);
        self.host.request_animation_frame();

        info!(
            event_type = "overlay",
            action = "opened",
            session = id.0,
            target_count,
            "Overlay opened"
        );
    }

    /// End the session: clear every mark and remove the overlay. Safe to call
    /// when closed.
    pub fn close(&mut self) {
        self.pending_focus = None;
        if let Some(session) = self.session.take() {
            let id = session.id();
            let released = session.teardown(&mut self.host);
            info!(
                event_type = "overlay",
                action = "closed",
                session = id.0,
                released = released.len(),
                "Overlay closed"
            );
        }
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Deferred part of opening: focus the search field. A no-op when the
    /// session it was scheduled for is gone.
    pub fn on_animation_frame(&mut self) {
        let Some(pending) = self.pending_focus.take() else {
            return;
        };
        match &self.session {
            Some(session) if session.id() == pending => self.host.focus_search_field(),
            _ => debug!(session = pending.0, "Dropped focus for torn-down overlay"),
        }
    }

    // ---------------------------------------------------------------------
    // Overlay events
    // ---------------------------------------------------------------------

    /// Search field `input` event.
    pub fn on_search_input(&mut self, query: &str) {
        if let Some(session) = self.session.as_mut() {
            session.filter(&mut self.host, query);
        }
    }

    /// A list entry gained focus.
    pub fn on_entry_focus(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut() {
            session.set_active(&mut self.host, Some(index));
        }
    }

    /// A list entry lost focus.
    pub fn on_entry_blur(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut() {
            if session.active() == Some(index) {
                session.set_active(&mut self.host, None);
            }
        }
    }

    pub fn on_entry_click(&mut self, index: usize) {
        self.execute(index);
    }

    /// Keydown on a focused list entry: Enter or Space executes it.
    pub fn on_entry_key(&mut self, index: usize, key: &str) -> KeyDisposition {
        if !self.is_open() {
            return KeyDisposition::Passthrough;
        }
        match key {
            "Enter" | " " => {
                self.execute(index);
                KeyDisposition::Handled
            }
            _ => KeyDisposition::Passthrough,
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
