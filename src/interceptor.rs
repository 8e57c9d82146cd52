use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::StorageChange;
use crate::ports::StoragePort;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// Receives every change written through an [`InterceptedStorage`].
pub trait ChangeSink: Send + Sync {
    fn local_change(&self, change: StorageChange);
}

/// Write decorator around a [`StoragePort`].
///
/// Reads pass straight through. A write first captures the current value,
/// then performs the real write exactly once, and only after it succeeded
/// hands the `(new, old)` pair to the sink. Once detached it behaves exactly
/// like the wrapped store.
pub struct InterceptedStorage {
    inner: Arc<dyn StoragePort>,
    sink: RwLock<Option<Weak<dyn ChangeSink>>>,
}

/// Wraps `storage` so writes are reported to `sink`.
pub fn intercept(storage: Arc<dyn StoragePort>, sink: Weak<dyn ChangeSink>) -> Arc<InterceptedStorage> {
    Arc::new(InterceptedStorage {
        inner: storage,
        sink: RwLock::new(Some(sink)),
    })
}

impl InterceptedStorage {
    /// The wrapped, un-intercepted store.
    pub fn original(&self) -> Arc<dyn StoragePort> {
        Arc::clone(&self.inner)
    }

    pub fn is_attached(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Stops reporting. Later writes go straight to the wrapped store.
    pub fn detach(&self) {
        self.sink.write().take();
    }

    fn current_sink(&self) -> Option<Arc<dyn ChangeSink>> {
        self.sink.read().as_ref().and_then(Weak::upgrade)
    }

    // A failed lookup counts as "absent".
    fn previous_value(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }
}

impl StoragePort for InterceptedStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, WatchError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), WatchError> {
        let Some(sink) = self.current_sink() else {
            return self.inner.set_item(key, value);
        };

        let old_value = self.previous_value(key);
        self.inner.set_item(key, value)?;
        sink.local_change(StorageChange::new(key, Some(value.to_string()), old_value));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), WatchError> {
        let Some(sink) = self.current_sink() else {
            return self.inner.remove_item(key);
        };

        let old_value = self.previous_value(key);
        self.inner.remove_item(key)?;
        if old_value.is_some() {
            sink.local_change(StorageChange::new(key, None, old_value));
        }
        Ok(())
    }
}
