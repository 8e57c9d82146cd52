use crate::global::{clear_timeout, set_timeout};
use crate::ports::{TimerHandle, TimerPort, TimerTask};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use wasm_bindgen::prelude::*;

static NEXT_TIMER_ID: AtomicU32 = AtomicU32::new(0);

// Scheduled callbacks stay owned here until they fire or are cancelled, so
// a cleared timeout releases its closure too.
thread_local! {
    static PENDING: RefCell<HashMap<u32, Closure<dyn FnMut()>>> = RefCell::new(HashMap::new());
}

fn release(id: u32) {
    let closure = PENDING.with(|pending| pending.borrow_mut().remove(&id));
    drop(closure);
}

/// `setTimeout` / `clearTimeout` adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTimers;

impl WebTimers {
    pub fn new() -> Self {
        Self
    }
}

pub struct WebTimeout {
    id: u32,
    handle: Option<i32>,
}

impl TimerHandle for WebTimeout {}

impl Drop for WebTimeout {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            clear_timeout(handle);
        }
        release(self.id);
    }
}

impl TimerPort for WebTimers {
    fn schedule(&self, delay: Duration, task: TimerTask) -> Box<dyn TimerHandle> {
        let id = NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            task();
            release(id);
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        let handle = set_timeout(callback.as_ref().unchecked_ref(), millis).ok();
        if handle.is_some() {
            PENDING.with(|pending| {
                pending.borrow_mut().insert(id, callback);
            });
        }

        Box::new(WebTimeout { id, handle })
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn pending_count() -> usize {
        PENDING.with(|pending| pending.borrow().len())
    }

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = set_timeout(&resolve, ms);
        });
        let _ = JsFuture::from(promise).await;
    }

    #[wasm_bindgen_test]
    fn test_cancelled_timer_releases_callback() {
        let timers = WebTimers::new();
        let before = pending_count();

        let handle = timers.schedule(Duration::from_millis(10), Box::new(|| {}));
        assert_eq!(pending_count(), before + 1);

        drop(handle);
        assert_eq!(pending_count(), before);
    }

    #[wasm_bindgen_test]
    async fn test_fired_timer_releases_callback() {
        let timers = WebTimers::new();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = Arc::clone(&fired);
        let before = pending_count();

        let _handle = timers.schedule(
            Duration::from_millis(5),
            Box::new(move || fired_clone.store(true, Ordering::SeqCst)),
        );
        sleep(40).await;

        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(pending_count(), before);
    }
}
