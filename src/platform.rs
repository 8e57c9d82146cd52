/// Platform - Dependency injection container for all ports.
///
/// Hybrid approach:
/// - Stateless ports: `&'static` references (zero-cost)
/// - Stateful ports: `Arc<dyn Trait>` (ref-counted, swappable per notifier)
use crate::domain::watch::types::StorageArea;
use crate::ports::{LoggerPort, RelayPort, StorageEventsPort, StoragePort, TimerPort};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use crate::adapters::native::{LocalBroadcast, MemoryStorage, ThreadTimers};
#[cfg(target_arch = "wasm32")]
use crate::adapters::wasm::{LocalStorage, WebBroadcast, WebTimers, WindowStorageEvents};

#[derive(Clone)]
pub struct Platform {
    logger: &'static dyn LoggerPort,
    storage: Arc<dyn StoragePort>,
    storage_events: Arc<dyn StorageEventsPort>,
    relay: Arc<dyn RelayPort>,
    timers: Arc<dyn TimerPort>,
}

impl Platform {
    /// Creates a new Platform with default adapters for the current target,
    /// watching the local storage area.
    pub fn new() -> Self {
        Self::for_area(StorageArea::Local)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn for_area(area: StorageArea) -> Self {
        Self {
            logger: crate::adapters::logger(),
            storage: Arc::new(LocalStorage::with_area(area)),
            storage_events: Arc::new(WindowStorageEvents::with_area(area)),
            relay: Arc::new(WebBroadcast),
            timers: Arc::new(WebTimers),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_area(area: StorageArea) -> Self {
        Self::with_memory_storage(MemoryStorage::with_area(area))
    }

    /// Native platform over an in-memory area. The same handle serves both
    /// reads/writes and storage events, so siblings of `storage` behave
    /// like other tabs.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_memory_storage(storage: MemoryStorage) -> Self {
        Self {
            logger: crate::adapters::logger(),
            storage: Arc::new(storage.clone()),
            storage_events: Arc::new(storage),
            relay: Arc::new(LocalBroadcast::global()),
            timers: Arc::new(ThreadTimers),
        }
    }

    pub fn with_logger(mut self, logger: &'static dyn LoggerPort) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn StoragePort>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_storage_events(mut self, storage_events: Arc<dyn StorageEventsPort>) -> Self {
        self.storage_events = storage_events;
        self
    }

    pub fn with_relay(mut self, relay: Arc<dyn RelayPort>) -> Self {
        self.relay = relay;
        self
    }

    pub fn with_timers(mut self, timers: Arc<dyn TimerPort>) -> Self {
        self.timers = timers;
        self
    }

    #[inline]
    pub fn logger(&self) -> &'static dyn LoggerPort {
        self.logger
    }

    #[inline]
    pub fn storage(&self) -> Arc<dyn StoragePort> {
        Arc::clone(&self.storage)
    }

    #[inline]
    pub fn storage_events(&self) -> Arc<dyn StorageEventsPort> {
        Arc::clone(&self.storage_events)
    }

    #[inline]
    pub fn relay(&self) -> Arc<dyn RelayPort> {
        Arc::clone(&self.relay)
    }

    #[inline]
    pub fn timers(&self) -> Arc<dyn TimerPort> {
        Arc::clone(&self.timers)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::adapters::native::ManualTimers;
    use crate::domain::watch::types::StorageEvent;
    use crate::domain::watch::diagnostics::testing::RecordingLogger;
    use std::time::Duration;

    #[test]
    fn test_platform_creation() {
        let platform = Platform::new();
        platform.logger().log("test");
        assert_eq!(platform.storage().get_item("missing").unwrap(), None);
    }

    #[test]
    fn test_platform_clone_shares_storage() {
        let platform = Platform::new();
        let cloned = platform.clone();
        platform.storage().set_item("k", "1").unwrap();
        assert_eq!(cloned.storage().get_item("k").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_platform_default_is_isolated() {
        let first = Platform::default();
        let second = Platform::default();
        first.storage().set_item("k", "1").unwrap();
        assert_eq!(second.storage().get_item("k").unwrap(), None);
    }

    #[test]
    fn test_platform_overrides() {
        let logger = RecordingLogger::leaked();
        let timers = Arc::new(ManualTimers::new());
        let platform = Platform::new()
            .with_logger(logger)
            .with_timers(timers.clone());

        platform.logger().warn("test warn");
        assert_eq!(logger.lines("warn"), vec!["test warn"]);

        let _handle = platform.timers().schedule(Duration::from_millis(5), Box::new(|| {}));
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_memory_storage_serves_events() {
        let tab_a = MemoryStorage::new();
        let platform = Platform::with_memory_storage(tab_a.sibling());
        let seen = Arc::new(parking_lot::Mutex::new(0));
        let seen_clone = Arc::clone(&seen);
        let _subscription = platform
            .storage_events()
            .subscribe(Box::new(move |_event: StorageEvent| *seen_clone.lock() += 1))
            .unwrap();

        tab_a.set_item("k", "1").unwrap();
        assert_eq!(*seen.lock(), 1);
    }
}
