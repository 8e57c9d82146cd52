use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    Serialization(String),
    Storage(String),
    Relay(String),
    ChannelClosed,
    Unavailable(String),
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchError::Serialization(msg) => write!(f, "Serialization Error: {msg}"),
            WatchError::Storage(msg) => write!(f, "Storage Error: {msg}"),
            WatchError::Relay(msg) => write!(f, "Relay Error: {msg}"),
            WatchError::ChannelClosed => write!(f, "Relay channel is closed"),
            WatchError::Unavailable(msg) => write!(f, "Unavailable: {msg}"),
        }
    }
}

impl std::error::Error for WatchError {}

impl WatchError {
    pub fn serialization(message: impl Into<String>) -> Self {
        WatchError::Serialization(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        WatchError::Storage(message.into())
    }

    pub fn relay(message: impl Into<String>) -> Self {
        WatchError::Relay(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        WatchError::Unavailable(message.into())
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::Serialization(err.to_string())
    }
}
