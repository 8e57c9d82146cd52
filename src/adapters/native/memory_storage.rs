use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::{StorageArea, StorageEvent};
use crate::ports::{StorageEventCallback, StorageEventsPort, StoragePort, Subscription};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

struct Listener {
    id: u64,
    context_id: u64,
    callback: Arc<StorageEventCallback>,
}

struct SharedArea {
    area: StorageArea,
    items: RwLock<HashMap<String, String>>,
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl SharedArea {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// In-memory storage area shared by sibling contexts.
///
/// Behaves like one tab's view of `localStorage`: every handle created with
/// [`MemoryStorage::sibling`] reads and writes the same items, and a write
/// from one context raises a [`StorageEvent`] in every *other* context.
/// Clones of a handle belong to the same context.
#[derive(Clone)]
pub struct MemoryStorage {
    context_id: u64,
    shared: Arc<SharedArea>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_area(StorageArea::Local)
    }

    pub fn with_area(area: StorageArea) -> Self {
        let shared = Arc::new(SharedArea {
            area,
            items: RwLock::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        });
        Self {
            context_id: shared.next_id(),
            shared,
        }
    }

    /// Another context over the same items.
    pub fn sibling(&self) -> Self {
        Self {
            context_id: self.shared.next_id(),
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn area(&self) -> StorageArea {
        self.shared.area
    }

    pub fn len(&self) -> usize {
        self.shared.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every item; other contexts see a key-less event.
    pub fn clear(&self) {
        let had_items = {
            let mut items = self.shared.items.write();
            let had_items = !items.is_empty();
            items.clear();
            had_items
        };
        if had_items {
            self.notify_others(None, None, None);
        }
    }

    fn notify_others(
        &self,
        key: Option<&str>,
        new_value: Option<String>,
        old_value: Option<String>,
    ) {
        let targets: Vec<Arc<StorageEventCallback>> = self
            .shared
            .listeners
            .lock()
            .iter()
            .filter(|listener| listener.context_id != self.context_id)
            .map(|listener| Arc::clone(&listener.callback))
            .collect();

        for callback in targets {
            callback(StorageEvent {
                key: key.map(str::to_string),
                new_value: new_value.clone(),
                old_value: old_value.clone(),
                area: self.shared.area,
            });
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, WatchError> {
        Ok(self.shared.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), WatchError> {
        let old_value = self
            .shared
            .items
            .write()
            .insert(key.to_string(), value.to_string());

        if old_value.as_deref() != Some(value) {
            self.notify_others(Some(key), Some(value.to_string()), old_value);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), WatchError> {
        let old_value = self.shared.items.write().remove(key);
        if old_value.is_some() {
            self.notify_others(Some(key), None, old_value);
        }
        Ok(())
    }
}

pub struct MemorySubscription {
    id: u64,
    shared: Weak<SharedArea>,
}

impl Subscription for MemorySubscription {}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.listeners.lock().retain(|listener| listener.id != self.id);
        }
    }
}

impl StorageEventsPort for MemoryStorage {
    fn subscribe(
        &self,
        callback: StorageEventCallback,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        let id = self.shared.next_id();
        self.shared.listeners.lock().push(Listener {
            id,
            context_id: self.context_id,
            callback: Arc::new(callback),
        });
        Ok(Box::new(MemorySubscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Events = Arc<Mutex<Vec<StorageEvent>>>;

    fn collect_events(storage: &MemoryStorage) -> (Box<dyn Subscription>, Events) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let subscription = storage
            .subscribe(Box::new(move |event: StorageEvent| {
                events_clone.lock().push(event)
            }))
            .unwrap();
        (subscription, events)
    }

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("theme").unwrap(), None);

        storage.set_item("theme", "\"dark\"").unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(storage.len(), 1);

        storage.remove_item("theme").unwrap();
        assert_eq!(storage.get_item("theme").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_siblings_share_items() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.sibling();

        tab_a.set_item("k", "1").unwrap();
        assert_eq!(tab_b.get_item("k").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_events_only_reach_other_contexts() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.sibling();
        let (_sub_a, events_a) = collect_events(&tab_a);
        let (_sub_b, events_b) = collect_events(&tab_b);

        tab_a.set_item("k", "1").unwrap();
        tab_a.set_item("k", "2").unwrap();

        assert!(events_a.lock().is_empty());
        assert_eq!(
            *events_b.lock(),
            vec![
                StorageEvent {
                    key: Some("k".to_string()),
                    new_value: Some("1".to_string()),
                    old_value: None,
                    area: StorageArea::Local,
                },
                StorageEvent {
                    key: Some("k".to_string()),
                    new_value: Some("2".to_string()),
                    old_value: Some("1".to_string()),
                    area: StorageArea::Local,
                },
            ]
        );
    }

    #[test]
    fn test_unchanged_value_raises_no_event() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.sibling();
        let (_sub, events) = collect_events(&tab_b);

        tab_a.set_item("k", "1").unwrap();
        tab_a.set_item("k", "1").unwrap();
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn test_remove_and_clear_events() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.sibling();
        tab_a.set_item("k", "1").unwrap();
        let (_sub, events) = collect_events(&tab_b);

        tab_a.remove_item("k").unwrap();
        tab_a.remove_item("k").unwrap();
        tab_a.set_item("j", "2").unwrap();
        tab_a.clear();

        let events = events.lock();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].new_value, None);
        assert_eq!(events[0].old_value.as_deref(), Some("1"));
        assert_eq!(events[2].key, None);
    }

    #[test]
    fn test_dropping_subscription_detaches() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.sibling();
        let (subscription, events) = collect_events(&tab_b);

        drop(subscription);
        tab_a.set_item("k", "1").unwrap();
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_separate_areas_are_isolated() {
        let local = MemoryStorage::new();
        let session = MemoryStorage::with_area(StorageArea::Session);
        local.set_item("k", "1").unwrap();
        assert_eq!(session.get_item("k").unwrap(), None);
        assert_eq!(session.area(), StorageArea::Session);
    }
}
