use super::diagnostics::Diagnostics;
use super::registry::{invoke_guarded, Handler};
use crate::ports::{TimerHandle, TimerPort, TimerTask};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Coalesce-to-latest wrapper around a single handler registration.
///
/// Every call cancels the pending timer and schedules a new one, so the
/// wrapped handler only sees the last `(new, old)` pair of a burst, `delay`
/// after the last call. The pending timer is owned here: dropping the
/// wrapper (e.g. on `unwatch`) cancels it.
pub struct Debounced<T> {
    key: String,
    handler: Handler<T>,
    timers: Arc<dyn TimerPort>,
    delay: Duration,
    diagnostics: Diagnostics,
    pending: Mutex<Option<Box<dyn TimerHandle>>>,
}

impl<T> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        key: impl Into<String>,
        handler: Handler<T>,
        timers: Arc<dyn TimerPort>,
        delay: Duration,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            key: key.into(),
            handler,
            timers,
            delay,
            diagnostics,
            pending: Mutex::new(None),
        }
    }

    pub fn call(&self, new_value: Option<&T>, old_value: Option<&T>) {
        let key = self.key.clone();
        let handler = Arc::clone(&self.handler);
        let diagnostics = self.diagnostics.clone();
        let new_value = new_value.cloned();
        let old_value = old_value.cloned();

        let task: TimerTask = Box::new(move || {
            invoke_guarded(
                &key,
                &handler,
                new_value.as_ref(),
                old_value.as_ref(),
                &diagnostics,
            );
        });

        let previous = self.pending.lock().take();
        drop(previous);

        let handle = self.timers.schedule(self.delay, task);
        *self.pending.lock() = Some(handle);
    }

    pub fn into_handler(self) -> Handler<T> {
        let debounced = Arc::new(self);
        Arc::new(move |new_value: Option<&T>, old_value: Option<&T>| {
            debounced.call(new_value, old_value)
        })
    }
}
