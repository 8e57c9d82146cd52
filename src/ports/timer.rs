use std::time::Duration;

pub type TimerTask = Box<dyn FnOnce() + Send>;

/// A pending scheduled task. Dropping the handle cancels the task if it
/// has not run yet.
pub trait TimerHandle: Send {}

/// Port for deferred, cancellable callbacks on the host event loop.
pub trait TimerPort: Send + Sync {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Box<dyn TimerHandle>;
}
