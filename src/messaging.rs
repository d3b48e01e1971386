//! Cross-context messages between the control surface and the page.
//!
//! # Protocol
//!
//! Requests are JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "HIGHLIGHT"}
//! ```
//!
//! The page acknowledges with `{"ok": true}`. Unknown message types get no
//! response.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::controller::OverlayController;
use crate::host::HostSurface;
use crate::overlay::PAGE_HIGHLIGHT_CLASS;

/// Messages the page-side controller understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuntimeMessage {
    /// Toggle the page-wide highlight class.
    #[serde(rename = "HIGHLIGHT")]
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub ok: bool,
}

/// Identifier of a browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u32);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    #[error("no receiving end in the target page")]
    NoReceiver,
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

/// Delivery of messages from the control surface to the active tab.
pub trait TabMessenger {
    fn active_tab(&self) -> Result<Option<TabId>, MessagingError>;
    fn send(&mut self, tab: TabId, message: &RuntimeMessage)
        -> Result<MessageResponse, MessagingError>;
}

/// Toggle the page-wide highlight. Independent of the overlay session.
/// Returns whether the highlight is now on.
pub fn toggle_page_highlight<H: HostSurface + ?Sized>(host: &mut H) -> bool {
    let on = host.toggle_body_class(PAGE_HIGHLIGHT_CLASS);
    info!(event_type = "page_highlight", on, "Toggled page highlight");
    on
}

impl<H: HostSurface> OverlayController<H> {
    pub fn handle_message(&mut self, message: &RuntimeMessage) -> MessageResponse {
        match message {
            RuntimeMessage::Highlight => {
                toggle_page_highlight(self.host_mut());
                MessageResponse { ok: true }
            }
        }
    }

    /// Handle a raw JSON message. Returns `None` for anything unrecognized.
    pub fn handle_raw_message(&mut self, raw: &serde_json::Value) -> Option<MessageResponse> {
        let message = serde_json::from_value::<RuntimeMessage>(raw.clone()).ok()?;
        Some(self.handle_message(&message))
    }
}
