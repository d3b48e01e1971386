//! Activation gesture and shortcut alphabet.
//!
//! This module provides:
//! - `ActivationGesture` - the configurable modifier+key combo that toggles the overlay
//! - `resolve` - total normalization of a raw persisted value into a gesture
//! - The positional 36-glyph alphabet used for per-entry shortcuts
//!
//! # Example
//!
//! ```ignore
//! use quickpress::shortcuts::{resolve, ActivationGesture};
//!
//! let gesture = resolve(&serde_json::json!({ "ctrl": true, "key": "Q" }));
//! assert_eq!(gesture, ActivationGesture::default());
//! println!("Display: {}", gesture.display()); // Ctrl+Q
//! ```

mod alphabet;
mod resolver;
mod types;


pub use alphabet::{glyph_for, index_of, ALPHABET_LEN, SHORTCUT_KEYS};
pub use resolver::{is_truthy, resolve, resolve_optional};
pub use types::{normalize_key_char, ActivationGesture};
