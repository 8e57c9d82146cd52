use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CHANNEL_NAME: &str = "localStorage-channel";
pub const MAX_LISTENERS_PER_KEY: usize = 10;
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

/// A logical change of one key, with values decoded from the store.
///
/// `None` means the key was absent before (`old_value`) or was removed
/// (`new_value`).
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent<T> {
    pub key: String,
    pub new_value: Option<T>,
    pub old_value: Option<T>,
}

/// A change as the store sees it: raw serialized strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub new_value: Option<String>,
    pub old_value: Option<String>,
}

impl StorageChange {
    pub fn new(
        key: impl Into<String>,
        new_value: Option<String>,
        old_value: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            new_value,
            old_value,
        }
    }
}

/// Wire record posted on the relay channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessage {
    pub key: String,
    pub new_value: Option<String>,
    pub old_value: Option<String>,
}

impl From<StorageChange> for RelayMessage {
    fn from(change: StorageChange) -> Self {
        Self {
            key: change.key,
            new_value: change.new_value,
            old_value: change.old_value,
        }
    }
}

impl From<RelayMessage> for StorageChange {
    fn from(message: RelayMessage) -> Self {
        Self {
            key: message.key,
            new_value: message.new_value,
            old_value: message.old_value,
        }
    }
}

/// Which host storage area a notifier tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageArea {
    #[default]
    Local,
    Session,
}

/// Native cross-context storage notification, fired in every context
/// sharing the area except the one that wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// `None` when the whole area was cleared.
    pub key: Option<String>,
    pub new_value: Option<String>,
    pub old_value: Option<String>,
    pub area: StorageArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchConfig {
    pub channel_name: String,
    pub max_listeners_per_key: usize,
    pub debounce_ms: u32,
    pub area: StorageArea,
    pub debug: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            max_listeners_per_key: MAX_LISTENERS_PER_KEY,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            area: StorageArea::Local,
            debug: false,
        }
    }
}

impl WatchConfig {
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    pub fn with_max_listeners_per_key(mut self, max: usize) -> Self {
        self.max_listeners_per_key = max;
        self
    }

    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn with_area(mut self, area: StorageArea) -> Self {
        self.area = area;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }
}
