#![cfg(not(target_arch = "wasm32"))]
#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use storage_watcher::adapters::native::{LocalBroadcast, ManualTimers, MemoryStorage};
use storage_watcher::ports::LoggerPort;
use storage_watcher::{ChangeNotifier, Platform, WatchConfig};

pub type Calls = Arc<Mutex<Vec<(Option<i32>, Option<i32>)>>>;

#[derive(Default)]
pub struct TestLogger {
    lines: Mutex<Vec<String>>,
}

impl TestLogger {
    pub fn leaked() -> &'static TestLogger {
        Box::leak(Box::new(TestLogger::default()))
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LoggerPort for TestLogger {
    fn log(&self, message: &str) {
        self.lines.lock().push(format!("log: {message}"));
    }

    fn error(&self, message: &str) {
        self.lines.lock().push(format!("error: {message}"));
    }

    fn warn(&self, message: &str) {
        self.lines.lock().push(format!("warn: {message}"));
    }
}

/// One simulated browser context (tab).
pub struct Tab {
    pub memory: MemoryStorage,
    pub logger: &'static TestLogger,
    pub notifier: ChangeNotifier<i32>,
}

/// Two tabs over the same storage area and broadcast hub, sharing a
/// virtual clock.
pub struct TwoTabs {
    pub hub: LocalBroadcast,
    pub timers: Arc<ManualTimers>,
    pub a: Tab,
    pub b: Tab,
}

pub fn tab(memory: MemoryStorage, hub: &LocalBroadcast, timers: &Arc<ManualTimers>) -> Tab {
    let logger = TestLogger::leaked();
    let platform = Platform::with_memory_storage(memory.clone())
        .with_relay(Arc::new(hub.clone()))
        .with_timers(timers.clone())
        .with_logger(logger);
    Tab {
        memory,
        logger,
        notifier: ChangeNotifier::new(platform, WatchConfig::default()),
    }
}

pub fn two_tabs() -> TwoTabs {
    let hub = LocalBroadcast::new();
    let timers = Arc::new(ManualTimers::new());
    let memory = MemoryStorage::new();
    let a = tab(memory.sibling(), &hub, &timers);
    let b = tab(memory.sibling(), &hub, &timers);
    a.notifier.init();
    b.notifier.init();
    TwoTabs { hub, timers, a, b }
}

pub fn record(notifier: &ChangeNotifier<i32>, key: &str) -> Calls {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let calls_clone = Arc::clone(&calls);
    notifier.watch(key, move |new, old| {
        calls_clone.lock().push((new.copied(), old.copied()))
    });
    calls
}
