use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::StorageArea;
use crate::global::window;
use crate::ports::StoragePort;
use web_sys::Storage;

/// `window.localStorage` / `window.sessionStorage` adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage {
    area: StorageArea,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(area: StorageArea) -> Self {
        Self { area }
    }

    pub fn area(&self) -> StorageArea {
        self.area
    }
}

pub(crate) fn storage_for(area: StorageArea) -> Result<Storage, WatchError> {
    let window = window()?;
    let storage = match area {
        StorageArea::Local => window.local_storage()?,
        StorageArea::Session => window.session_storage()?,
    };
    storage.ok_or_else(|| WatchError::unavailable("Storage area is not available"))
}

impl StoragePort for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, WatchError> {
        Ok(storage_for(self.area)?.get_item(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), WatchError> {
        Ok(storage_for(self.area)?.set_item(key, value)?)
    }

    fn remove_item(&self, key: &str) -> Result<(), WatchError> {
        Ok(storage_for(self.area)?.remove_item(key)?)
    }
}
