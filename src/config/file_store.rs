//! JSON file backed configuration store.
//!
//! Stored in ~/.quickpress/settings.json as a flat object of key -> value.
//! A missing file reads as empty.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::defaults::{SETTINGS_DIR_NAME, SETTINGS_FILE_NAME};
use super::store::{ChangeNotifier, ConfigStore, StoreChange, StoreError};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
    notifier: ChangeNotifier,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Unavailable(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                type_name(&other)
            ))),
        }
    }

    fn save(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(&self, key: &str, new_value: Option<Value>) -> Result<(), StoreError> {
        let change = {
            let _guard = self.write_lock.lock();
            let mut values = self.load()?;
            let old_value = match &new_value {
                Some(value) => values.insert(key.to_string(), value.clone()),
                None => values.remove(key),
            };
            if old_value.is_none() && new_value.is_none() {
                return Ok(());
            }
            self.save(&values)?;
            StoreChange {
                key: key.to_string(),
                old_value,
                new_value,
            }
        };
        self.notifier.notify(change);
        Ok(())
    }
}

impl ConfigStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.update(key, Some(value))?;
        info!(key, "Saved setting");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(key, None)
    }

    fn subscribe(&self) -> async_channel::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}

/// Get the default settings path (~/.quickpress/settings.json)
pub fn default_settings_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(SETTINGS_DIR_NAME)
        .join(SETTINGS_FILE_NAME)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
