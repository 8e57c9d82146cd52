/// Native adapters - in-process implementations for native Rust (non-WASM).

pub mod console_logger;
pub mod local_broadcast;
pub mod manual_timers;
pub mod memory_storage;
pub mod thread_timers;

pub use console_logger::ConsoleLogger;
pub use local_broadcast::LocalBroadcast;
pub use manual_timers::ManualTimers;
pub use memory_storage::MemoryStorage;
pub use thread_timers::ThreadTimers;
