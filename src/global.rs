use crate::domain::watch::error::WatchError;
use wasm_bindgen::prelude::*;
use web_sys::{self, DedicatedWorkerGlobalScope, Window, WorkerGlobalScope};

pub fn get_global_scope() -> Result<JsValue, WatchError> {
    // Try worker scope first
    if let Ok(scope) = js_sys::global().dyn_into::<DedicatedWorkerGlobalScope>() {
        return Ok(JsValue::from(scope));
    }

    // Fallback to window
    let window = web_sys::window().ok_or(WatchError::unavailable(
        "Neither DedicatedWorkerGlobalScope nor Window found",
    ))?;
    Ok(JsValue::from(window))
}

/// Storage areas and `storage` events only exist on a window.
pub fn window() -> Result<Window, WatchError> {
    web_sys::window().ok_or_else(|| WatchError::unavailable("No window in this global scope"))
}

pub fn set_timeout(callback: &js_sys::Function, millis: i32) -> Result<i32, WatchError> {
    let global = get_global_scope()?;

    if let Ok(worker) = global.clone().dyn_into::<WorkerGlobalScope>() {
        Ok(worker.set_timeout_with_callback_and_timeout_and_arguments_0(callback, millis)?)
    } else if let Ok(window) = global.dyn_into::<Window>() {
        Ok(window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, millis)?)
    } else {
        Err(WatchError::unavailable("Could not access timers"))
    }
}

pub fn clear_timeout(handle: i32) {
    let Ok(global) = get_global_scope() else {
        return;
    };

    if let Ok(worker) = global.clone().dyn_into::<WorkerGlobalScope>() {
        worker.clear_timeout_with_handle(handle);
    } else if let Ok(window) = global.dyn_into::<Window>() {
        window.clear_timeout_with_handle(handle);
    }
}
