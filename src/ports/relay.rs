use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::RelayMessage;

pub type MessageCallback = Box<dyn Fn(RelayMessage) + Send + Sync>;

/// Port for opening named broadcast channels shared between contexts.
///
/// A message posted on an endpoint is delivered to every *other* open
/// endpoint with the same name, never back to the sender.
pub trait RelayPort: Send + Sync {
    fn open(&self, name: &str, on_message: MessageCallback)
        -> Result<Box<dyn RelayChannel>, WatchError>;
}

/// One open endpoint of a broadcast channel.
pub trait RelayChannel: Send + Sync {
    fn post(&self, message: &RelayMessage) -> Result<(), WatchError>;

    /// Stops delivery in both directions. Idempotent.
    fn close(&self);
}
