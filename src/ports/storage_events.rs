use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::StorageEvent;

pub type StorageEventCallback = Box<dyn Fn(StorageEvent) + Send + Sync>;

/// Dropping the subscription detaches the listener.
pub trait Subscription: Send {}

/// Port for the host's own cross-context storage notifications.
///
/// Only events for the storage area backing the platform's `StoragePort`
/// are delivered; filtering by area is the adapter's job.
pub trait StorageEventsPort: Send + Sync {
    fn subscribe(&self, callback: StorageEventCallback)
        -> Result<Box<dyn Subscription>, WatchError>;
}
