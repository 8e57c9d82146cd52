use crate::domain::watch::error::WatchError;
use wasm_bindgen::JsValue;

/// Conversion from JsValue to WatchError for WASM infrastructure
impl From<JsValue> for WatchError {
    fn from(err: JsValue) -> Self {
        WatchError::storage(
            err.as_string()
                .unwrap_or_else(|| format!("{:?}", err)),
        )
    }
}

/// Conversion from WatchError to JsValue for WASM boundary
impl From<WatchError> for JsValue {
    fn from(error: WatchError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
