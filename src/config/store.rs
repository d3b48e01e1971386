//! Key/value configuration store with change notifications.
//!
//! Subscribers receive a `StoreChange` for every write on an unbounded
//! channel and drain it without blocking. Closed subscribers are pruned on
//! the next write.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors reading or writing persisted configuration.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// One key changed value. `None` means absent.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

pub trait ConfigStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn subscribe(&self) -> async_channel::Receiver<StoreChange>;
}

/// Fan-out of change notifications to every live subscriber.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<async_channel::Sender<StoreChange>>>,
}

impl ChangeNotifier {
    pub fn subscribe(&self) -> async_channel::Receiver<StoreChange> {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn notify(&self, change: StoreChange) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        debug!(
            key = %change.key,
            subscribers = subscribers.len(),
            "Notifying store change"
        );
        for tx in subscribers.iter() {
            let _ = tx.try_send(change.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

/// In-process store. Shared between contexts behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    notifier: ChangeNotifier,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: Value) -> Self {
        let store = Self::default();
        store.values.lock().insert(key.to_string(), value);
        store
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let old_value = self.values.lock().insert(key.to_string(), value.clone());
        self.notifier.notify(StoreChange {
            key: key.to_string(),
            old_value,
            new_value: Some(value),
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let old_value = self.values.lock().remove(key);
        if old_value.is_some() {
            self.notifier.notify(StoreChange {
                key: key.to_string(),
                old_value,
                new_value: None,
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> async_channel::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn subscribe(&self) -> async_channel::Receiver<StoreChange> {
        (**self).subscribe()
    }
}
