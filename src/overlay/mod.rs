//! Overlay renderer - the floating, searchable list of page controls.
//!
//! # Module Structure
//!
//! - `render` - builds the `OverlayView` tree from discovered targets
//! - `filter` - substring search over entry labels (hide, never remove)
//! - `style` - class names and the injected stylesheet

mod filter;
mod render;
mod style;

pub use filter::{apply_filter, matches_query, normalize_query};
pub use render::{
    render, OverlayEntry, OverlayView, CLICK_MARKER, OVERLAY_ID, OVERLAY_INSTRUCTIONS,
    OVERLAY_TITLE, SEARCH_PLACEHOLDER,
};
pub use style::{
    stylesheet, PAGE_HIGHLIGHT_CLASS, STYLESHEET_ID, TARGET_ACTIVE_CLASS, TARGET_MARK_CLASS,
};
