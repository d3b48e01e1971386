//! Builds the overlay's visual tree from a set of targets.

use crate::discovery::Target;

/// Fixed id of the overlay root. At most one element with this id exists.
pub const OVERLAY_ID: &str = "quickpress-overlay";
pub const PANEL_CLASS: &str = "quickpress-panel";
pub const SEARCH_CLASS: &str = "quickpress-search";
pub const SHORTCUT_CLASS: &str = "quickpress-shortcut";

pub const OVERLAY_TITLE: &str = "QuickPress Actions";
pub const OVERLAY_INSTRUCTIONS: &str =
    "Search by text, press the shortcut key, or click an item. Press Esc to cancel.";
pub const SEARCH_PLACEHOLDER: &str = "Filter buttons and links...";

/// Badge text for entries past the end of the shortcut alphabet.
pub const CLICK_MARKER: &str = "click";

/// One list entry, backed by the target at `index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayEntry {
    /// `data-index`
    pub index: usize,
    pub label: String,
    /// `data-label`: the lowercased label, used for filtering.
    pub label_key: String,
    /// `data-shortcut`, absent once the alphabet is exhausted.
    pub shortcut: Option<char>,
    pub visible: bool,
}

impl OverlayEntry {
    pub fn badge(&self) -> String {
        self.shortcut
            .map(|c| c.to_string())
            .unwrap_or_else(|| CLICK_MARKER.to_string())
    }
}

/// The overlay tree: backdrop root, panel with title, instructions, search
/// field and list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayView {
    pub root_id: &'static str,
    pub title: &'static str,
    pub instructions: &'static str,
    pub search_placeholder: &'static str,
    pub query: String,
    pub entries: Vec<OverlayEntry>,
}

impl OverlayView {
    pub fn visible_entries(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter().filter(|e| e.visible)
    }

    /// Plain-text rendering used by the simulator.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("#{} {}\n", self.root_id, self.title));
        out.push_str(&format!("  {}\n", self.instructions));
        if self.query.is_empty() {
            out.push_str(&format!("  [{}]\n", self.search_placeholder));
        } else {
            out.push_str(&format!("  [{}]\n", self.query));
        }
        for entry in self.visible_entries() {
            out.push_str(&format!("  {:>5}  {}\n", entry.badge(), entry.label));
        }
        out
    }
}

/// Build the overlay tree: one entry per target, carrying its derived label
/// and assigned glyph.
pub fn render(targets: &[Target]) -> OverlayView {
    let entries = targets
        .iter()
        .enumerate()
        .map(|(index, target)| OverlayEntry {
            index,
            label: target.label.clone(),
            label_key: target.label.to_lowercase(),
            shortcut: target.shortcut,
            visible: true,
        })
        .collect();

    OverlayView {
        root_id: OVERLAY_ID,
        title: OVERLAY_TITLE,
        instructions: OVERLAY_INSTRUCTIONS,
        search_placeholder: SEARCH_PLACEHOLDER,
        query: String::new(),
        entries,
    }
}
