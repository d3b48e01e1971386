//! Positional single-key shortcut alphabet for overlay entries.

/// Digits first, then letters. The Nth discovered target gets the Nth glyph.
pub const SHORTCUT_KEYS: &str = "1234567890abcdefghijklmnopqrstuvwxyz";

/// Number of targets that can receive a shortcut glyph.
pub const ALPHABET_LEN: usize = 36;

/// Glyph assigned to the target at `index`, or `None` once the alphabet is exhausted.
pub fn glyph_for(index: usize) -> Option<char> {
    SHORTCUT_KEYS.chars().nth(index)
}

/// Position of a (lowercased) key in the alphabet.
///
/// Only single-character keys qualify; named keys such as `enter` or `f1`
/// never index a target.
pub fn index_of(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    SHORTCUT_KEYS.chars().position(|k| k == c)
}
