use crate::ports::{TimerHandle, TimerPort, TimerTask};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Native timer adapter: one sleeping thread per scheduled task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTimers;

impl ThreadTimers {
    pub fn new() -> Self {
        Self
    }
}

/// Whoever takes the task out of the slot first wins: the sleeper runs it,
/// a drop discards it.
pub struct ThreadTimeout {
    slot: Arc<Mutex<Option<TimerTask>>>,
}

impl TimerHandle for ThreadTimeout {}

impl Drop for ThreadTimeout {
    fn drop(&mut self) {
        let cancelled = self.slot.lock().take();
        drop(cancelled);
    }
}

impl TimerPort for ThreadTimers {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Box<dyn TimerHandle> {
        let slot = Arc::new(Mutex::new(Some(task)));
        let sleeper_slot = Arc::clone(&slot);

        thread::spawn(move || {
            thread::sleep(delay);
            let task = sleeper_slot.lock().take();
            if let Some(task) = task {
                task();
            }
        });

        Box::new(ThreadTimeout { slot })
    }
}
