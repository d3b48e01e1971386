//! Case-insensitive substring filter over overlay entries.
//!
//! Entries that do not match are hidden, never removed, so their indices and
//! shortcut glyphs stay stable while the user types.

use super::render::OverlayEntry;

/// Trimmed, lowercased form of a search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether an entry's lowercased label matches an already-normalized query.
/// An empty query matches everything.
pub fn matches_query(label_key: &str, normalized_query: &str) -> bool {
    normalized_query.is_empty() || label_key.contains(normalized_query)
}

/// Apply `query` to `entries`, returning the indices whose visibility changed.
pub fn apply_filter(entries: &mut [OverlayEntry], query: &str) -> Vec<usize> {
    let normalized = normalize_query(query);
    let mut changed = Vec::new();
    for entry in entries.iter_mut() {
        let visible = matches_query(&entry.label_key, &normalized);
        if entry.visible != visible {
            entry.visible = visible;
            changed.push(entry.index);
        }
    }
    changed
}
