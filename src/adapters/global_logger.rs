/// Global logger instance - automatically selects implementation based on build target.
///
/// Supports both WASM (browser console) and native (stdout/stderr) platforms.
/// The correct implementation is selected at compile time based on the target architecture.

use crate::ports::LoggerPort;
use once_cell::sync::Lazy;

#[cfg(target_arch = "wasm32")]
use crate::adapters::wasm::ConsoleLogger;
#[cfg(not(target_arch = "wasm32"))]
use crate::adapters::native::ConsoleLogger;

pub static LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

/// Get the global logger instance.
#[inline]
pub fn logger() -> &'static dyn LoggerPort {
    &*LOGGER
}
