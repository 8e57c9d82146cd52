/// WASM adapters - implementations using browser APIs.

pub mod broadcast_channel;
pub mod console_logger;
pub mod error_conversions;
pub mod local_storage;
pub mod storage_events;
pub mod timers;

pub use broadcast_channel::WebBroadcast;
pub use console_logger::ConsoleLogger;
pub use local_storage::LocalStorage;
pub use storage_events::WindowStorageEvents;
pub use timers::WebTimers;
