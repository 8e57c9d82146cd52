use super::converters;
use crate::domain::watch::WatchConfig;
use crate::notifier::ChangeNotifier;
use crate::platform::Platform;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use wasm_bindgen::prelude::*;

static NEXT_HANDLER_ID: AtomicU32 = AtomicU32::new(0);

thread_local! {
    static NOTIFIER: RefCell<Option<ChangeNotifier<Value>>> = RefCell::new(None);
    static JS_HANDLERS: RefCell<HashMap<u32, js_sys::Function>> = RefCell::new(HashMap::new());
}

/// Owned by the Rust-side handler; releases the JS function with it.
struct JsHandlerSlot {
    id: u32,
    key: String,
}

impl JsHandlerSlot {
    fn register(key: &str, function: js_sys::Function) -> Self {
        let id = NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed);
        JS_HANDLERS.with(|handlers| {
            handlers.borrow_mut().insert(id, function);
        });
        Self {
            id,
            key: key.to_string(),
        }
    }

    fn call(&self, new_value: Option<&Value>, old_value: Option<&Value>) {
        let function = JS_HANDLERS.with(|handlers| handlers.borrow().get(&self.id).cloned());
        let Some(function) = function else {
            return;
        };

        let result = function.call2(
            &JsValue::NULL,
            &converters::json_to_js(new_value),
            &converters::json_to_js(old_value),
        );
        if let Err(e) = result {
            if current().is_debug() {
                crate::adapters::logger().error(&format!(
                    "[StorageWatcher] Handler error for key {}: {:?}",
                    self.key, e
                ));
            }
        }
    }
}

impl Drop for JsHandlerSlot {
    fn drop(&mut self) {
        let id = self.id;
        JS_HANDLERS.with(|handlers| {
            handlers.borrow_mut().remove(&id);
        });
    }
}

fn current() -> ChangeNotifier<Value> {
    NOTIFIER.with(|notifier| {
        notifier
            .borrow_mut()
            .get_or_insert_with(|| ChangeNotifier::new(Platform::new(), WatchConfig::default()))
            .clone()
    })
}

/// Replaces the page's notifier with one built from `options`
/// (`{ channelName, maxListenersPerKey, debounceMs, area, debug }`).
/// Existing registrations are dropped.
#[wasm_bindgen]
pub fn configure(options: JsValue) -> Result<(), JsValue> {
    let config = converters::js_to_config(options)?;
    if current().is_initialized() {
        return Err(converters::to_js_error(
            "Cannot configure while initialized; call destroy() first",
        ));
    }

    let notifier = ChangeNotifier::new(Platform::for_area(config.area), config);
    let previous = NOTIFIER.with(|slot| slot.borrow_mut().replace(notifier));
    drop(previous);
    Ok(())
}

#[wasm_bindgen]
pub fn init() {
    current().init();
}

#[wasm_bindgen]
pub fn destroy() {
    current().destroy();
}

#[wasm_bindgen(js_name = enableDebug)]
pub fn enable_debug() {
    current().enable_debug();
}

#[wasm_bindgen]
pub fn watch(key: &str, handler: js_sys::Function) -> bool {
    let slot = JsHandlerSlot::register(key, handler);
    current().watch(key, move |new_value, old_value| slot.call(new_value, old_value))
}

#[wasm_bindgen(js_name = watchWithDebounce)]
pub fn watch_with_debounce(key: &str, handler: js_sys::Function, delay_ms: Option<u32>) -> bool {
    let slot = JsHandlerSlot::register(key, handler);
    current().watch_with_debounce(
        key,
        move |new_value, old_value| slot.call(new_value, old_value),
        delay_ms.map(|ms| Duration::from_millis(u64::from(ms))),
    )
}

#[wasm_bindgen]
pub fn unwatch(key: &str) {
    current().unwatch(key);
}

#[wasm_bindgen(js_name = clearWatchers)]
pub fn clear_watchers() {
    current().clear_watchers();
}

/// Stores `value` as JSON through the intercepted store.
#[wasm_bindgen(js_name = setItem)]
pub fn set_item(key: &str, value: JsValue) -> Result<(), JsValue> {
    let value = converters::js_to_json(value)?;
    current().write(key, &value).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = getItem)]
pub fn get_item(key: &str) -> Result<JsValue, JsValue> {
    let value = current().read(key).map_err(JsValue::from)?;
    Ok(converters::json_to_js(value.as_ref()))
}

#[wasm_bindgen(js_name = removeItem)]
pub fn remove_item(key: &str) -> Result<(), JsValue> {
    current().remove(key).map_err(JsValue::from)
}
