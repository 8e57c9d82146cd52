use super::diagnostics::{panic_message, Diagnostics};
use super::types::ChangeEvent;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked with `(new_value, old_value)`.
pub type Handler<T> = Arc<dyn Fn(Option<&T>, Option<&T>) + Send + Sync>;

/// Per-key ordered handler sequences with a capacity bound.
pub struct Registry<T> {
    max_per_key: usize,
    handlers: RwLock<HashMap<String, Vec<Handler<T>>>>,
}

impl<T> Registry<T> {
    pub fn new(max_per_key: usize) -> Self {
        Self {
            max_per_key,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Appends `handler` to the key's sequence. Returns `false` without
    /// registering when the key is already at capacity.
    pub fn register<F>(&self, key: &str, handler: F) -> bool
    where
        F: Fn(Option<&T>, Option<&T>) + Send + Sync + 'static,
    {
        self.register_handler(key, Arc::new(handler))
    }

    pub fn register_handler(&self, key: &str, handler: Handler<T>) -> bool {
        let mut handlers = self.handlers.write();
        let entries = handlers.entry(key.to_string()).or_default();
        if entries.len() >= self.max_per_key {
            return false;
        }
        entries.push(handler);
        true
    }

    /// Removes every handler for `key`. Returns how many were dropped.
    pub fn remove_key(&self, key: &str) -> usize {
        // Dropped after the guard, like `clear`.
        let removed = self.handlers.write().remove(key);
        removed.map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        // Handlers may own timers whose Drop touches other locks.
        let drained = std::mem::take(&mut *self.handlers.write());
        drop(drained);
    }

    pub fn handler_count(&self, key: &str) -> usize {
        self.handlers.read().get(key).map(Vec::len).unwrap_or(0)
    }

    fn handlers_for(&self, key: &str) -> Vec<Handler<T>> {
        self.handlers.read().get(key).cloned().unwrap_or_default()
    }

    /// Invokes every handler registered for `event.key`, in registration
    /// order. A panicking handler is logged in debug mode and skipped.
    pub fn dispatch(&self, event: &ChangeEvent<T>, diagnostics: &Diagnostics) {
        for handler in self.handlers_for(&event.key) {
            invoke_guarded(
                &event.key,
                &handler,
                event.new_value.as_ref(),
                event.old_value.as_ref(),
                diagnostics,
            );
        }
    }
}

pub(crate) fn invoke_guarded<T>(
    key: &str,
    handler: &Handler<T>,
    new_value: Option<&T>,
    old_value: Option<&T>,
    diagnostics: &Diagnostics,
) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| handler(new_value, old_value)));
    if let Err(payload) = result {
        diagnostics.debug(&format!(
            "Handler error for key {key}: {}",
            panic_message(payload.as_ref())
        ));
    }
}
