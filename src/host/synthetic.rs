//! In-memory document model implementing `HostSurface`.
//!
//! Records every effect the overlay core has on the page so tests and the
//! simulator can inspect class marks, overlay presence, focus, and the exact
//! page state at the moment each target was activated.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{ElementId, ElementSnapshot, EventTarget, HostSurface};
use crate::overlay::{OverlayView, TARGET_ACTIVE_CLASS, TARGET_MARK_CLASS};

/// Where input focus currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Element(ElementId),
    SearchField,
}

/// Page state captured when `activate` fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationRecord {
    pub element: ElementId,
    pub overlay_present: bool,
    /// Elements still carrying a target mark (base or active).
    pub marked_elements: usize,
    pub focused: Option<Focus>,
}

#[derive(Clone, Debug)]
struct SyntheticElement {
    snapshot: ElementSnapshot,
    classes: BTreeSet<String>,
}

#[derive(Clone, Debug)]
struct MountedOverlay {
    view: OverlayView,
    hidden: BTreeSet<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct SyntheticDocument {
    elements: Vec<SyntheticElement>,
    body_classes: BTreeSet<String>,
    stylesheets: BTreeMap<String, String>,
    overlay: Option<MountedOverlay>,
    focused: Option<Focus>,
    pending_frames: usize,
    mount_count: usize,
    activations: Vec<ActivationRecord>,
}

/// Parse a page fixture: a JSON array of element snapshots in document order.
pub fn load_page_fixture(json: &str) -> crate::error::Result<Vec<ElementSnapshot>> {
    Ok(serde_json::from_str(json)?)
}

impl SyntheticDocument {
    pub fn new(elements: Vec<ElementSnapshot>) -> Self {
        Self {
            elements: elements
                .into_iter()
                .map(|snapshot| SyntheticElement {
                    snapshot,
                    classes: BTreeSet::new(),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn push_element(&mut self, snapshot: ElementSnapshot) {
        self.elements.push(SyntheticElement {
            snapshot,
            classes: BTreeSet::new(),
        });
    }

    pub fn remove_element(&mut self, id: ElementId) {
        self.elements.retain(|e| e.snapshot.id != id);
    }

    pub fn set_rendered(&mut self, id: ElementId, rendered: bool) {
        if let Some(element) = self.element_mut(id) {
            element.snapshot.rendered = rendered;
        }
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(element) = self.element_mut(id) {
            element.snapshot.disabled = disabled;
        }
    }

    pub fn classes_of(&self, id: ElementId) -> Vec<String> {
        self.elements
            .iter()
            .find(|e| e.snapshot.id == id)
            .map(|e| e.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .iter()
            .any(|e| e.snapshot.id == id && e.classes.contains(class))
    }

    /// Number of elements carrying a base or active target mark.
    pub fn marked_count(&self) -> usize {
        self.elements.iter().filter(|e| is_marked(e)).count()
    }

    pub fn active_marked(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.classes.contains(TARGET_ACTIVE_CLASS))
            .map(|e| e.snapshot.id)
            .collect()
    }

    pub fn body_has_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn stylesheet_ids(&self) -> Vec<&str> {
        self.stylesheets.keys().map(String::as_str).collect()
    }

    pub fn overlay_present(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn overlay(&self) -> Option<&OverlayView> {
        self.overlay.as_ref().map(|o| &o.view)
    }

    /// How many times an overlay has been mounted over the document's lifetime.
    pub fn mount_count(&self) -> usize {
        self.mount_count
    }

    /// Labels of entries currently shown in the mounted overlay.
    pub fn visible_entry_labels(&self) -> Vec<String> {
        match &self.overlay {
            Some(mounted) => mounted
                .view
                .entries
                .iter()
                .filter(|e| !mounted.hidden.contains(&e.index))
                .map(|e| e.label.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn focused(&self) -> Option<Focus> {
        self.focused
    }

    /// The element a key press would be dispatched from. The overlay search
    /// field is a text input; with nothing focused, events come from the body.
    pub fn focused_target(&self) -> EventTarget {
        match self.focused {
            Some(Focus::SearchField) => EventTarget::element("input"),
            Some(Focus::Element(id)) => self
                .elements
                .iter()
                .find(|e| e.snapshot.id == id)
                .map(|e| EventTarget::element(e.snapshot.tag.clone()))
                .unwrap_or_else(EventTarget::body),
            None => EventTarget::body(),
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.pending_frames
    }

    /// Consume pending frame requests, returning how many fired.
    pub fn take_animation_frames(&mut self) -> usize {
        std::mem::take(&mut self.pending_frames)
    }

    pub fn activations(&self) -> &[ActivationRecord] {
        &self.activations
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut SyntheticElement> {
        self.elements.iter_mut().find(|e| e.snapshot.id == id)
    }
}

fn is_marked(element: &SyntheticElement) -> bool {
    element.classes.contains(TARGET_MARK_CLASS) || element.classes.contains(TARGET_ACTIVE_CLASS)
}

impl HostSurface for SyntheticDocument {
    fn query_interactive_elements(&self) -> Vec<ElementSnapshot> {
        self.elements
            .iter()
            .filter(|e| e.snapshot.matches_interactive_selector())
            .map(|e| e.snapshot.clone())
            .collect()
    }

    fn install_stylesheet(&mut self, id: &str, css: &str) {
        self.stylesheets
            .entry(id.to_string())
            .or_insert_with(|| css.to_string());
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.element_mut(element) {
            el.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.element_mut(element) {
            el.classes.remove(class);
        }
    }

    fn toggle_body_class(&mut self, class: &str) -> bool {
        if self.body_classes.remove(class) {
            false
        } else {
            self.body_classes.insert(class.to_string());
            true
        }
    }

    fn mount_overlay(&mut self, view: &OverlayView) {
        self.mount_count += 1;
        self.overlay = Some(MountedOverlay {
            view: view.clone(),
            hidden: BTreeSet::new(),
        });
    }

    fn unmount_overlay(&mut self) {
        if self.overlay.take().is_some() && self.focused == Some(Focus::SearchField) {
            self.focused = None;
        }
    }

    fn set_entry_visible(&mut self, index: usize, visible: bool) {
        if let Some(mounted) = self.overlay.as_mut() {
            if visible {
                mounted.hidden.remove(&index);
            } else {
                mounted.hidden.insert(index);
            }
        }
    }

    fn focus_search_field(&mut self) {
        if self.overlay.is_some() {
            self.focused = Some(Focus::SearchField);
        }
    }

    fn request_animation_frame(&mut self) {
        self.pending_frames += 1;
    }

    fn focus(&mut self, element: ElementId) {
        if self.elements.iter().any(|e| e.snapshot.id == element) {
            self.focused = Some(Focus::Element(element));
        }
    }

    fn activate(&mut self, element: ElementId) {
        let record = ActivationRecord {
            element,
            overlay_present: self.overlay.is_some(),
            marked_elements: self.marked_count(),
            focused: self.focused,
        };
        debug!(element = element.0, overlay_present = record.overlay_present, "Synthetic activation");
        self.activations.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_applies_interactive_selector_in_document_order() {
        let doc = SyntheticDocument::new(vec![
            ElementSnapshot::new(1, "div").with_text("plain"),
            ElementSnapshot::button(2, "Go"),
            ElementSnapshot::new(3, "a").with_text("no href"),
            ElementSnapshot::link(4, "/home", "Home"),
            ElementSnapshot::new(5, "span").with_role("button").with_text("Fake"),
        ]);
        let ids: Vec<u32> = doc
            .query_interactive_elements()
            .iter()
            .map(|e| e.id.0)
            .collect();
        assert_eq!(ids, vec![2, 4, 5]);
    }

    #[test]
    fn page_fixture_uses_defaults_for_missing_fields() {
        let elements = load_page_fixture(
            r#"[
                {"id": 1, "tag": "button", "innerText": "Save"},
                {"id": 2, "tag": "a", "href": "/home", "rendered": false},
                {"id": 3, "tag": "div", "role": "button", "ariaLabel": "Menu", "disabled": true}
            ]"#,
        )
        .unwrap();
        assert_eq!(elements[0], ElementSnapshot::button(1, "Save"));
        assert!(!elements[1].rendered);
        assert_eq!(elements[2].aria_label.as_deref(), Some("Menu"));
        assert!(elements[2].disabled);

        assert!(load_page_fixture("{}").is_err());
    }

    #[test]
    fn stylesheet_install_is_idempotent() {
        let mut doc = SyntheticDocument::default();
        doc.install_stylesheet("quickpress-style", "a {}");
        doc.install_stylesheet("quickpress-style", "b {}");
        assert_eq!(doc.stylesheet_ids(), vec!["quickpress-style"]);
    }

    #[test]
    fn focused_target_follows_document_focus() {
        let mut doc = SyntheticDocument::new(vec![ElementSnapshot::button(1, "Go")]);
        assert_eq!(doc.focused_target(), EventTarget::body());

        doc.focus(ElementId(1));
        assert_eq!(doc.focused_target(), EventTarget::element("button"));

        doc.mount_overlay(&crate::overlay::render(&[]));
        doc.focus_search_field();
        assert!(doc.focused_target().is_typing_field());

        doc.unmount_overlay();
        assert_eq!(doc.focused_target(), EventTarget::body());
    }

    #[test]
    fn body_class_toggle_reports_presence() {
        let mut doc = SyntheticDocument::default();
        assert!(doc.toggle_body_class("x"));
        assert!(doc.body_has_class("x"));
        assert!(!doc.toggle_body_class("x"));
        assert!(!doc.body_has_class("x"));
    }
}
