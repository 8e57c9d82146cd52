/// Ports module - Defines the interfaces (traits) that abstract platform-specific functionality.
///
/// This module contains all the port traits that define contracts between the domain layer
/// and the infrastructure adapters. These traits enable the hexagonal architecture by
/// decoupling the watch logic from the browser or the native test harness.

pub mod logger;
pub mod relay;
pub mod storage;
pub mod storage_events;
pub mod timer;

pub use logger::LoggerPort;
pub use relay::{MessageCallback, RelayChannel, RelayPort};
pub use storage::StoragePort;
pub use storage_events::{StorageEventCallback, StorageEventsPort, Subscription};
pub use timer::{TimerHandle, TimerPort, TimerTask};
