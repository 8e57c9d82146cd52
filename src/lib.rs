#[cfg(feature = "console_error_panic_hook")]
extern crate console_error_panic_hook;

// Hexagonal architecture modules
pub mod domain;
pub mod ports;
pub mod adapters;
pub mod platform;

pub mod facades;
pub mod interceptor;
pub mod notifier;

#[cfg(target_arch = "wasm32")]
pub mod global;

// Re-exports for testing
pub use domain::watch::{
    ChangeEvent, Codec, JsonCodec, RelayMessage, StorageArea, StorageChange, StorageEvent,
    WatchConfig, WatchError,
};
pub use interceptor::{intercept, ChangeSink, InterceptedStorage};
pub use notifier::ChangeNotifier;
pub use platform::Platform;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start_app() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    Ok(())
}
