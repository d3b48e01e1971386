//! Host page capability.
//!
//! The overlay core never touches a concrete rendering engine. Everything it
//! needs from the page (element queries, class marks, overlay mounting, focus
//! and activation) goes through `HostSurface`. The host in turn delivers key
//! events to `OverlayController::handle_key_event` from a single capturing
//! document-level listener, and calls `OverlayController::on_animation_frame`
//! when a requested frame fires.
//!
//! `synthetic::SyntheticDocument` is an in-memory implementation used by the
//! tests and by the page simulator binary.

pub mod synthetic;

use serde::{Deserialize, Serialize};

use crate::overlay::OverlayView;

/// Opaque handle to one element of the host document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// Point-in-time view of one element returned by an interactive-element query.
///
/// `tag` is lowercase. `rendered` mirrors a non-null offset parent: false for
/// elements that are `display:none` or detached from layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_rendered")]
    pub rendered: bool,
    #[serde(default)]
    pub inner_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_id: Option<String>,
}

fn default_rendered() -> bool {
    true
}

impl ElementSnapshot {
    pub fn new(id: u32, tag: impl Into<String>) -> Self {
        Self {
            id: ElementId(id),
            tag: tag.into().to_lowercase(),
            role: None,
            href: None,
            disabled: false,
            rendered: true,
            inner_text: String::new(),
            aria_label: None,
            title: None,
            dom_id: None,
        }
    }

    pub fn button(id: u32, text: impl Into<String>) -> Self {
        Self::new(id, "button").with_text(text)
    }

    pub fn link(id: u32, href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, "a").with_href(href).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.inner_text = text.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_dom_id(mut self, dom_id: impl Into<String>) -> Self {
        self.dom_id = Some(dom_id.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.rendered = false;
        self
    }

    pub fn is_button(&self) -> bool {
        self.tag == "button"
    }

    pub fn is_anchor(&self) -> bool {
        self.tag == "a"
    }

    /// `button, [role='button'], a[href]`
    pub fn matches_interactive_selector(&self) -> bool {
        self.is_button()
            || self.role.as_deref() == Some("button")
            || (self.is_anchor() && self.href.is_some())
    }
}

/// The element a key event was dispatched to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTarget {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub content_editable: bool,
}

impl EventTarget {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            content_editable: false,
        }
    }

    pub fn content_editable(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            content_editable: true,
        }
    }

    /// Document body; the target of key events when nothing is focused.
    pub fn body() -> Self {
        Self::element("body")
    }

    /// An element that captures character input: input, textarea, select,
    /// or any content-editable region.
    pub fn is_typing_field(&self) -> bool {
        self.content_editable
            || matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }
}

/// Everything the overlay core needs from the host page.
pub trait HostSurface {
    /// Elements matching the interactive selector, in document order.
    fn query_interactive_elements(&self) -> Vec<ElementSnapshot>;

    /// Insert a stylesheet unless one with the same id is already present.
    fn install_stylesheet(&mut self, id: &str, css: &str);

    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Toggle a class on the document body. Returns whether it is now present.
    fn toggle_body_class(&mut self, class: &str) -> bool;

    /// Insert the overlay tree into the document.
    fn mount_overlay(&mut self, view: &OverlayView);
    /// Remove the overlay tree. A no-op when nothing is mounted.
    fn unmount_overlay(&mut self);
    /// Show or hide (without removing) one overlay list entry.
    fn set_entry_visible(&mut self, index: usize, visible: bool);
    /// Move input focus into the overlay's search field.
    fn focus_search_field(&mut self);

    /// Ask for `OverlayController::on_animation_frame` on the next frame.
    fn request_animation_frame(&mut self);

    fn focus(&mut self, element: ElementId);
    /// Simulate a primary action (click) on the element.
    fn activate(&mut self, element: ElementId);
}
