/// Persistent store capability over chrome.storage-style backends
///
/// Two partitions: `Sync` (small, replicated across the user's devices,
/// holds preferences) and `Local` (device-only, holds widget caches).
/// Writes merge by key; change events are delivered for the synced
/// partition only, to every subscriber including the writer.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type JsonMap = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Sync,
    Local,
}

/// Old/new value pair for one changed key, chrome.storage.onChanged shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyChange {
    #[serde(rename = "oldValue", default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(rename = "newValue", default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

pub type ChangeSet = HashMap<String, KeyChange>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
    #[error("failed to decode stored value: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Async capability interface for the host key/value store.
///
/// Both UI surfaces talk to the store through this trait, so the chrome
/// bridge and the in-memory fake are interchangeable.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Batch read; absent keys are simply missing from the result map.
    async fn get(&self, area: StorageArea, keys: &[&str]) -> Result<JsonMap, StoreError>;

    /// Merge the given entries into the partition, key by key.
    async fn set(&self, area: StorageArea, entries: JsonMap) -> Result<(), StoreError>;

    async fn remove(&self, area: StorageArea, keys: &[&str]) -> Result<(), StoreError>;

    /// Register a listener for synced-partition change events. Cache writes
    /// to the local partition never produce events.
    fn subscribe(&self, listener: impl Fn(&ChangeSet) + 'static);
}

#[derive(Default)]
struct MemoryInner {
    sync: JsonMap,
    local: JsonMap,
    listeners: Vec<Rc<dyn Fn(&ChangeSet)>>,
}

/// In-memory store fake. Cloned handles share state, so two clones model
/// the two independently-running UI surfaces communicating through the
/// host store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        let listeners: Vec<_> = self.inner.borrow().listeners.clone();
        for listener in listeners {
            listener(changes);
        }
    }
}

impl SettingsStore for MemoryStore {
    async fn get(&self, area: StorageArea, keys: &[&str]) -> Result<JsonMap, StoreError> {
        let inner = self.inner.borrow();
        let partition = match area {
            StorageArea::Sync => &inner.sync,
            StorageArea::Local => &inner.local,
        };
        let mut result = JsonMap::new();
        for key in keys {
            if let Some(value) = partition.get(*key) {
                result.insert((*key).to_string(), value.clone());
            }
        }
        Ok(result)
    }

    async fn set(&self, area: StorageArea, entries: JsonMap) -> Result<(), StoreError> {
        let mut changes = ChangeSet::new();
        {
            let mut inner = self.inner.borrow_mut();
            let partition = match area {
                StorageArea::Sync => &mut inner.sync,
                StorageArea::Local => &mut inner.local,
            };
            for (key, value) in entries {
                let old = partition.get(&key).cloned();
                if old.as_ref() == Some(&value) {
                    continue;
                }
                partition.insert(key.clone(), value.clone());
                changes.insert(
                    key,
                    KeyChange {
                        old_value: old,
                        new_value: Some(value),
                    },
                );
            }
        }
        if area == StorageArea::Sync {
            self.notify(&changes);
        }
        Ok(())
    }

    async fn remove(&self, area: StorageArea, keys: &[&str]) -> Result<(), StoreError> {
        let mut changes = ChangeSet::new();
        {
            let mut inner = self.inner.borrow_mut();
            let partition = match area {
                StorageArea::Sync => &mut inner.sync,
                StorageArea::Local => &mut inner.local,
            };
            for key in keys {
                if let Some(old) = partition.remove(*key) {
                    changes.insert(
                        (*key).to_string(),
                        KeyChange {
                            old_value: Some(old),
                            new_value: None,
                        },
                    );
                }
            }
        }
        if area == StorageArea::Sync {
            self.notify(&changes);
        }
        Ok(())
    }

    fn subscribe(&self, listener: impl Fn(&ChangeSet) + 'static) {
        self.inner.borrow_mut().listeners.push(Rc::new(listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn entries(pairs: &[(&str, Value)]) -> JsonMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_get_returns_only_present_keys() {
        let store = MemoryStore::new();
        block_on(store.set(StorageArea::Sync, entries(&[("a", json!(1))]))).unwrap();

        let result = block_on(store.get(StorageArea::Sync, &["a", "missing"])).unwrap();

        assert_eq!(result.get("a"), Some(&json!(1)));
        assert!(!result.contains_key("missing"));
    }

    #[test]
    fn test_partitions_are_independent() {
        let store = MemoryStore::new();
        block_on(store.set(StorageArea::Local, entries(&[("a", json!("local"))]))).unwrap();

        let result = block_on(store.get(StorageArea::Sync, &["a"])).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_sync_write_notifies_other_handle_with_old_and_new() {
        let writer = MemoryStore::new();
        let reader = writer.clone();

        let seen: Rc<RefCell<Vec<ChangeSet>>> = Rc::default();
        let sink = seen.clone();
        reader.subscribe(move |changes| sink.borrow_mut().push(changes.clone()));

        block_on(writer.set(StorageArea::Sync, entries(&[("showParticles", json!(true))]))).unwrap();
        block_on(writer.set(StorageArea::Sync, entries(&[("showParticles", json!(false))]))).unwrap();

        let events = seen.borrow();
        assert_eq!(events.len(), 2);
        let change = &events[1]["showParticles"];
        assert_eq!(change.old_value, Some(json!(true)));
        assert_eq!(change.new_value, Some(json!(false)));
    }

    #[test]
    fn test_unchanged_value_produces_no_event() {
        let store = MemoryStore::new();
        block_on(store.set(StorageArea::Sync, entries(&[("k", json!("v"))]))).unwrap();

        let seen: Rc<RefCell<usize>> = Rc::default();
        let sink = seen.clone();
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        block_on(store.set(StorageArea::Sync, entries(&[("k", json!("v"))]))).unwrap();

        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_local_write_produces_no_event() {
        let store = MemoryStore::new();
        let seen: Rc<RefCell<usize>> = Rc::default();
        let sink = seen.clone();
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        block_on(store.set(StorageArea::Local, entries(&[("weatherCache", json!({}))]))).unwrap();

        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_remove_notifies_with_old_value() {
        let store = MemoryStore::new();
        block_on(store.set(StorageArea::Sync, entries(&[("k", json!(7))]))).unwrap();

        let seen: Rc<RefCell<Vec<ChangeSet>>> = Rc::default();
        let sink = seen.clone();
        store.subscribe(move |changes| sink.borrow_mut().push(changes.clone()));

        block_on(store.remove(StorageArea::Sync, &["k"])).unwrap();

        let events = seen.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["k"].old_value, Some(json!(7)));
        assert_eq!(events[0]["k"].new_value, None);
    }
}
