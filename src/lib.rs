//! QuickPress - keyboard command palette for the controls of a web page.
//!
//! This library provides the in-page overlay core: target discovery, the
//! overlay lifecycle, keyboard dispatch, the active-highlight state machine,
//! and the execution bridge. The page itself is reached through the
//! `host::HostSurface` capability, so the core runs unchanged against a real
//! document or the in-memory `host::synthetic::SyntheticDocument`.

pub mod config;
pub mod control_panel;
pub mod controller;
pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod highlight;
pub mod host;
pub mod logging;
pub mod messaging;
pub mod overlay;
pub mod session;
pub mod shortcuts;

// Execution bridge (impl block on OverlayController)
mod execute;

pub use controller::OverlayController;
pub use dispatcher::{KeyDisposition, KeyEvent};
pub use host::{HostSurface, ElementId, ElementSnapshot, EventTarget};
pub use shortcuts::ActivationGesture;
