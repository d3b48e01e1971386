//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Store key holding the serialized activation gesture
pub const SHORTCUT_STORAGE_KEY: &str = "shortcut";

/// Default activation gesture: Ctrl+Q
pub const DEFAULT_SHORTCUT_CTRL: bool = true;
pub const DEFAULT_SHORTCUT_KEY: char = 'q';

/// Settings directory under the user's home (~/.quickpress)
pub const SETTINGS_DIR_NAME: &str = ".quickpress";
/// Settings file inside the settings directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";
