//! Target discovery.
//!
//! Queries the live page for interactive controls and keeps the ones a user
//! could actually press: rendered (non-null offset parent) and not a disabled
//! button. Discovery runs fresh on every overlay open; nothing is cached.

use tracing::debug;

use crate::host::{ElementId, ElementSnapshot, HostSurface};
use crate::shortcuts::glyph_for;

/// One discovered control eligible for overlay-driven invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub element: ElementId,
    pub label: String,
    /// Positional glyph; `None` past the end of the alphabet.
    pub shortcut: Option<char>,
    /// Carries the base mark while the session is open.
    pub marked: bool,
}

/// Discover eligible targets in document order.
pub fn discover<H: HostSurface + ?Sized>(host: &H) -> Vec<Target> {
    let candidates = host.query_interactive_elements();
    let total = candidates.len();

    let targets: Vec<Target> = candidates
        .iter()
        .filter(|snapshot| is_eligible(snapshot))
        .enumerate()
        .map(|(index, snapshot)| Target {
            element: snapshot.id,
            label: derive_label(snapshot, index),
            shortcut: glyph_for(index),
            marked: false,
        })
        .collect();

    debug!(
        candidates = total,
        eligible = targets.len(),
        "Discovered interactive targets"
    );
    targets
}

/// Rendered and not a disabled button.
///
/// Only `<button>` honours `disabled`; a disabled-looking `role="button"`
/// element or link stays eligible.
pub fn is_eligible(snapshot: &ElementSnapshot) -> bool {
    snapshot.matches_interactive_selector()
        && snapshot.rendered
        && !(snapshot.is_button() && snapshot.disabled)
}

/// Display label, by priority: visible text, aria-label, title, element id,
/// href (links only), then "Element N" (1-based position).
pub fn derive_label(snapshot: &ElementSnapshot, index: usize) -> String {
    let text = snapshot.inner_text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    let href = if snapshot.is_anchor() {
        snapshot.href.as_deref()
    } else {
        None
    };

    [
        snapshot.aria_label.as_deref(),
        snapshot.title.as_deref(),
        snapshot.dom_id.as_deref(),
        href,
    ]
    .into_iter()
    .flatten()
    .find(|candidate| !candidate.is_empty())
    .map(str::to_string)
    .unwrap_or_else(|| format!("Element {}", index + 1))
}
