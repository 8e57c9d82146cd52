/// Facades - JS-facing entry points over the notifier.

#[cfg(target_arch = "wasm32")]
pub mod wasm;
