use crate::ports::{TimerHandle, TimerPort, TimerTask};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<(Duration, u64), TimerTask>,
}

/// Virtual-clock timers. Nothing runs until [`ManualTimers::advance`] moves
/// the clock past a task's deadline.
#[derive(Default)]
pub struct ManualTimers {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time since creation.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().now
    }

    pub fn pending(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Moves the clock forward by `by`, running due tasks in deadline order.
    /// Tasks scheduled while advancing run too if they fall due in range.
    pub fn advance(&self, by: Duration) {
        let target = self.state.lock().now + by;

        loop {
            let due = {
                let mut state = self.state.lock();
                let next = state.tasks.keys().next().copied();
                match next {
                    Some(key) if key.0 <= target => {
                        state.now = key.0;
                        state.tasks.remove(&key)
                    }
                    _ => None,
                }
            };

            match due {
                Some(task) => task(),
                None => break,
            }
        }

        self.state.lock().now = target;
    }
}

pub struct ManualTimeout {
    key: (Duration, u64),
    state: Weak<Mutex<ManualState>>,
}

impl TimerHandle for ManualTimeout {}

impl Drop for ManualTimeout {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let cancelled = state.lock().tasks.remove(&self.key);
            drop(cancelled);
        }
    }
}

impl TimerPort for ManualTimers {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Box<dyn TimerHandle> {
        let mut state = self.state.lock();
        let key = (state.now + delay, state.next_id);
        state.next_id += 1;
        state.tasks.insert(key, task);

        Box::new(ManualTimeout {
            key,
            state: Arc::downgrade(&self.state),
        })
    }
}
