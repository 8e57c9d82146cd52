use crate::domain::watch::WatchConfig;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

pub fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

pub fn js_to_json(value: JsValue) -> Result<serde_json::Value, JsValue> {
    if value.is_undefined() {
        return Ok(serde_json::Value::Null);
    }
    from_value(value).map_err(to_js_error)
}

/// Builds a plain JS value (objects stay objects, not `Map`s).
pub fn json_to_js(value: Option<&serde_json::Value>) -> JsValue {
    match value {
        Some(value) => js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

/// `undefined` and `null` select the defaults.
pub fn js_to_config(options: JsValue) -> Result<WatchConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(WatchConfig::default());
    }
    from_value(options).map_err(|e| to_js_error(format!("Invalid watch options: {}", e)))
}
