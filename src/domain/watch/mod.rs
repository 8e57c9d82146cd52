pub mod codec;
pub mod debounce;
pub mod diagnostics;
pub mod error;
pub mod registry;
pub mod types;

pub use codec::{Codec, JsonCodec};
pub use debounce::Debounced;
pub use diagnostics::Diagnostics;
pub use error::WatchError;
pub use registry::{Handler, Registry};
pub use types::{
    ChangeEvent, RelayMessage, StorageArea, StorageChange, StorageEvent, WatchConfig,
    DEFAULT_CHANNEL_NAME, DEFAULT_DEBOUNCE_MS, MAX_LISTENERS_PER_KEY,
};
