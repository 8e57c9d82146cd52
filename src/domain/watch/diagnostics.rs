use crate::ports::LoggerPort;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const PREFIX: &str = "[StorageWatcher]";

/// Logger handle shared by everything a notifier owns.
///
/// Warnings always go out. Debug messages (swallowed errors) are only
/// emitted once debug mode is on.
#[derive(Clone)]
pub struct Diagnostics {
    logger: &'static dyn LoggerPort,
    debug: Arc<AtomicBool>,
}

impl Diagnostics {
    pub fn new(logger: &'static dyn LoggerPort, debug: bool) -> Self {
        Self {
            logger,
            debug: Arc::new(AtomicBool::new(debug)),
        }
    }

    pub fn enable_debug(&self) {
        self.debug.store(true, Ordering::Relaxed);
    }

    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub fn debug(&self, message: &str) {
        if self.is_debug() {
            self.logger.log(&format!("{PREFIX} {message}"));
        }
    }

    pub fn warn(&self, message: &str) {
        self.logger.warn(&format!("{PREFIX} {message}"));
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
