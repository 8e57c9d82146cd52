use super::local_storage::storage_for;
use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::{StorageArea, StorageEvent};
use crate::global::window;
use crate::ports::{StorageEventCallback, StorageEventsPort, Subscription};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use wasm_bindgen::prelude::*;

const STORAGE_EVENT: &str = "storage";

static NEXT_LISTENER_ID: AtomicU32 = AtomicU32::new(0);

thread_local! {
    static LISTENERS: RefCell<HashMap<u32, Closure<dyn FnMut(web_sys::StorageEvent)>>> =
        RefCell::new(HashMap::new());
}

/// Listens to the window `storage` event, keeping only events raised for
/// the tracked storage area.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowStorageEvents {
    area: StorageArea,
}

impl WindowStorageEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(area: StorageArea) -> Self {
        Self { area }
    }
}

fn is_tracked_area(event: &web_sys::StorageEvent, area: StorageArea) -> bool {
    match (event.storage_area(), storage_for(area)) {
        (Some(event_area), Ok(tracked)) => js_sys::Object::is(&event_area, &tracked),
        _ => false,
    }
}

impl StorageEventsPort for WindowStorageEvents {
    fn subscribe(
        &self,
        callback: StorageEventCallback,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        let area = self.area;
        let closure = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
            if !is_tracked_area(&event, area) {
                return;
            }
            callback(StorageEvent {
                key: event.key(),
                new_value: event.new_value(),
                old_value: event.old_value(),
                area,
            });
        }) as Box<dyn FnMut(web_sys::StorageEvent)>);

        window()?
            .add_event_listener_with_callback(STORAGE_EVENT, closure.as_ref().unchecked_ref())?;

        let id = NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed);
        LISTENERS.with(|listeners| {
            listeners.borrow_mut().insert(id, closure);
        });

        Ok(Box::new(WindowSubscription { id }))
    }
}

pub struct WindowSubscription {
    id: u32,
}

impl Subscription for WindowSubscription {}

impl Drop for WindowSubscription {
    fn drop(&mut self) {
        let removed = LISTENERS.with(|listeners| listeners.borrow_mut().remove(&self.id));
        if let (Some(closure), Ok(window)) = (removed, window()) {
            let _ = window.remove_event_listener_with_callback(
                STORAGE_EVENT,
                closure.as_ref().unchecked_ref(),
            );
        }
    }
}
