//! Configuration module - persisted settings and change notifications
//!
//! This module provides functionality for:
//! - A key/value `ConfigStore` with change notifications
//! - In-memory and JSON-file backed stores (~/.quickpress/settings.json)
//! - Default values for all settings
//! - First-run seeding of the activation gesture
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `store` - `ConfigStore` trait, `MemoryStore`, change notifications
//! - `file_store` - `JsonFileStore`
//! - `seed` - first-run initialization

mod defaults;
mod file_store;
mod seed;
mod store;

pub use defaults::{
    DEFAULT_SHORTCUT_CTRL, DEFAULT_SHORTCUT_KEY, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME,
    SHORTCUT_STORAGE_KEY,
};
pub use file_store::{default_settings_path, JsonFileStore};
pub use seed::{seed_default_shortcut, InstallReason};
pub use store::{ChangeNotifier, ConfigStore, MemoryStore, StoreChange, StoreError};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
