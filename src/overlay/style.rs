//! Stylesheet injected once per page.

use super::render::{OVERLAY_ID, PANEL_CLASS, SEARCH_CLASS, SHORTCUT_CLASS};

pub const STYLESHEET_ID: &str = "quickpress-style";

/// Page-wide highlight toggled by the `HIGHLIGHT` message and the toolbar action.
pub const PAGE_HIGHLIGHT_CLASS: &str = "quickpress-highlight";
/// Base mark on every target of an open session.
pub const TARGET_MARK_CLASS: &str = "quickpress-button-highlight";
/// Extra mark on the single active target.
pub const TARGET_ACTIVE_CLASS: &str = "quickpress-button-highlight-active";

pub fn stylesheet() -> String {
    format!(
        r#"
  .{page} {{
    transition: box-shadow 200ms ease-in-out, background 200ms ease-in-out;
    box-shadow: inset 0 0 0 4px rgba(37, 99, 235, 0.4);
    background: rgba(148, 197, 255, 0.2);
  }}

  .{mark} {{
    outline: 3px dashed rgba(37, 99, 235, 0.7) !important;
    outline-offset: 2px !important;
    position: relative;
  }}

  .{active} {{
    box-shadow: inset 0 0 0 4px rgba(37, 99, 235, 0.7),
      0 0 12px rgba(37, 99, 235, 0.6) !important;
    background: rgba(148, 197, 255, 0.45) !important;
  }}

  #{root} {{
    position: fixed;
    inset: 0;
    z-index: 2147483647;
    display: flex;
    align-items: flex-start;
    justify-content: center;
    padding: 24px 16px 32px;
    font-family: system-ui, -apple-system, Segoe UI, sans-serif;
  }}

  #{root} .{panel} {{
    background: #f8fafc;
    min-width: 320px;
    max-width: min(520px, 90vw);
    max-height: min(70vh, 520px);
    border-radius: 12px;
    padding: 16px;
    box-shadow: 0 12px 40px rgba(0, 0, 0, 0.3);
    display: flex;
    flex-direction: column;
    gap: 12px;
  }}

  #{root} h2 {{ margin: 0; font-size: 18px; color: #0f172a; }}
  #{root} p {{ margin: 0; font-size: 13px; color: #475569; }}

  #{root} .{search} {{
    width: 100%;
    border: 1px solid #cbd5f5;
    border-radius: 8px;
    padding: 8px 12px;
    font-size: 14px;
    outline: none;
  }}

  #{root} .{search}:focus {{
    border-color: #2563eb;
    box-shadow: 0 0 0 2px rgba(37, 99, 235, 0.2);
  }}

  #{root} ul {{
    list-style: none;
    padding: 0;
    margin: 0;
    overflow-y: auto;
    display: flex;
    flex-direction: column;
    gap: 8px;
  }}

  #{root} li {{
    display: flex;
    align-items: center;
    justify-content: space-between;
    background: #e2e8f0;
    border-radius: 8px;
    padding: 10px 14px;
    cursor: pointer;
    font-size: 14px;
    color: #0f172a;
  }}

  #{root} li:hover,
  #{root} li:focus-visible {{ background: #cbd5f5; }}

  #{root} .{shortcut} {{
    background: #1d4ed8;
    color: #fff;
    font-weight: 600;
    border-radius: 6px;
    padding: 2px 8px;
    font-size: 12px;
  }}
"#,
        page = PAGE_HIGHLIGHT_CLASS,
        mark = TARGET_MARK_CLASS,
        active = TARGET_ACTIVE_CLASS,
        root = OVERLAY_ID,
        panel = PANEL_CLASS,
        search = SEARCH_CLASS,
        shortcut = SHORTCUT_CLASS,
    )
}
