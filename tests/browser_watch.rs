#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use storage_watcher::facades::wasm::watcher;
use storage_watcher::{ChangeNotifier, Platform, WatchConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("no window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("failed to set timeout");
    });
    JsFuture::from(promise).await.expect("sleep failed");
}

fn notifier(channel: &str) -> ChangeNotifier<i32> {
    ChangeNotifier::new(
        Platform::new(),
        WatchConfig::default().with_channel_name(channel),
    )
}

type Calls = Rc<RefCell<Vec<(JsValue, JsValue)>>>;

fn js_recorder() -> (js_sys::Function, Calls) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let calls_clone = calls.clone();
    let closure = Closure::wrap(Box::new(move |new_value: JsValue, old_value: JsValue| {
        calls_clone.borrow_mut().push((new_value, old_value));
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    (closure.into_js_value().unchecked_into(), calls)
}

#[wasm_bindgen_test]
fn test_local_write_dispatches() {
    let notifier = notifier("browser-local");
    notifier.init();
    notifier.remove("browser-local-key").unwrap();
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    notifier.watch("browser-local-key", move |new, old| {
        seen_clone.lock().push((new.copied(), old.copied()))
    });

    notifier.write("browser-local-key", &1).unwrap();
    notifier.write("browser-local-key", &2).unwrap();

    assert_eq!(*seen.lock(), vec![(Some(1), None), (Some(2), Some(1))]);
    assert_eq!(notifier.read("browser-local-key").unwrap(), Some(2));
    notifier.destroy();
}

#[wasm_bindgen_test]
fn test_destroy_restores_plain_writes() {
    let notifier = notifier("browser-destroy");
    notifier.init();
    notifier.destroy();
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(0));
    let seen_clone = seen.clone();
    notifier.watch("browser-destroy-key", move |_, _| *seen_clone.lock() += 1);

    notifier.write("browser-destroy-key", &3).unwrap();

    assert_eq!(*seen.lock(), 0);
    let raw = web_sys::window()
        .unwrap()
        .local_storage()
        .unwrap()
        .unwrap()
        .get_item("browser-destroy-key")
        .unwrap();
    assert_eq!(raw.as_deref(), Some("3"));
}

#[wasm_bindgen_test]
async fn test_broadcast_reaches_other_notifier() {
    let sender = notifier("browser-relay");
    let receiver = notifier("browser-relay");
    sender.init();
    receiver.init();
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    receiver.watch("browser-relay-key", move |new, _| {
        seen_clone.lock().push(new.copied())
    });

    sender.write("browser-relay-key", &9).unwrap();
    sleep(50).await;

    assert_eq!(*seen.lock(), vec![Some(9)]);
    sender.destroy();
    receiver.destroy();
}

#[wasm_bindgen_test]
async fn test_debounce_with_browser_timers() {
    let notifier = notifier("browser-debounce");
    notifier.init();
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    notifier.watch_with_debounce(
        "browser-debounce-key",
        move |new, _| seen_clone.lock().push(new.copied()),
        Some(Duration::from_millis(30)),
    );

    for value in 1..=3 {
        notifier.write("browser-debounce-key", &value).unwrap();
    }
    assert!(seen.lock().is_empty());

    sleep(100).await;
    assert_eq!(*seen.lock(), vec![Some(3)]);
    notifier.destroy();
}

#[wasm_bindgen_test]
fn test_js_facade() {
    watcher::configure(JsValue::UNDEFINED).unwrap();
    watcher::init();
    watcher::remove_item("facade-key").unwrap();
    let (handler, calls) = js_recorder();
    assert!(watcher::watch("facade-key", handler));

    watcher::set_item("facade-key", JsValue::from_str("dark")).unwrap();

    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(calls.borrow()[0].0.as_string().as_deref(), Some("dark"));
    assert!(calls.borrow()[0].1.is_null());
    assert_eq!(
        watcher::get_item("facade-key").unwrap().as_string().as_deref(),
        Some("dark")
    );

    assert!(watcher::configure(JsValue::UNDEFINED).is_err());
    watcher::clear_watchers();
    watcher::destroy();
}

#[wasm_bindgen_test]
fn test_js_handler_exception_is_isolated() {
    watcher::configure(JsValue::UNDEFINED).unwrap();
    watcher::init();
    watcher::enable_debug();
    let throwing = js_sys::Function::new_with_args("n, o", "throw new Error('boom')");
    let (handler, calls) = js_recorder();
    watcher::watch("facade-throw", throwing);
    watcher::watch("facade-throw", handler);

    assert!(watcher::set_item("facade-throw", JsValue::from_f64(1.0)).is_ok());
    assert_eq!(calls.borrow().len(), 1);
    watcher::destroy();
}
