use crate::domain::watch::error::WatchError;

/// Port for a synchronous string key-value store (localStorage-like).
pub trait StoragePort: Send + Sync {
    /// Returns `None` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, WatchError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), WatchError>;

    fn remove_item(&self, key: &str) -> Result<(), WatchError>;
}
