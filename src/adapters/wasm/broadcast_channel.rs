use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::RelayMessage;
use crate::ports::{MessageCallback, RelayChannel, RelayPort};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use wasm_bindgen::prelude::*;
use web_sys::{BroadcastChannel, MessageEvent};

static NEXT_CHANNEL_ID: AtomicU32 = AtomicU32::new(0);

struct OpenChannel {
    channel: BroadcastChannel,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
}

// JS handles are not Send; endpoints only carry an id into this table.
thread_local! {
    static OPEN_CHANNELS: RefCell<HashMap<u32, OpenChannel>> = RefCell::new(HashMap::new());
}

/// `BroadcastChannel` adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebBroadcast;

impl WebBroadcast {
    pub fn new() -> Self {
        Self
    }
}

impl RelayPort for WebBroadcast {
    fn open(
        &self,
        name: &str,
        on_message: MessageCallback,
    ) -> Result<Box<dyn RelayChannel>, WatchError> {
        let channel =
            BroadcastChannel::new(name).map_err(|e| WatchError::relay(format!("{:?}", e)))?;

        let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
            // Other code may share the channel name; skip what we can't read.
            if let Ok(message) = serde_wasm_bindgen::from_value::<RelayMessage>(event.data()) {
                on_message(message);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        channel.set_onmessage(Some(closure.as_ref().unchecked_ref()));

        let id = NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed);
        OPEN_CHANNELS.with(|channels| {
            channels.borrow_mut().insert(
                id,
                OpenChannel {
                    channel,
                    _on_message: closure,
                },
            );
        });

        Ok(Box::new(WebChannel { id }))
    }
}

pub struct WebChannel {
    id: u32,
}

impl RelayChannel for WebChannel {
    fn post(&self, message: &RelayMessage) -> Result<(), WatchError> {
        let value = serde_wasm_bindgen::to_value(message)
            .map_err(|e| WatchError::serialization(format!("{:?}", e)))?;

        OPEN_CHANNELS.with(|channels| match channels.borrow().get(&self.id) {
            Some(open) => open
                .channel
                .post_message(&value)
                .map_err(|e| WatchError::relay(format!("{:?}", e))),
            None => Err(WatchError::ChannelClosed),
        })
    }

    fn close(&self) {
        let removed = OPEN_CHANNELS.with(|channels| channels.borrow_mut().remove(&self.id));
        if let Some(open) = removed {
            open.channel.set_onmessage(None);
            open.channel.close();
        }
    }
}

impl Drop for WebChannel {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_open_post_close() {
        let relay = WebBroadcast::new();
        let channel = relay.open("__watch_test", Box::new(|_: RelayMessage| {})).unwrap();
        let message = RelayMessage {
            key: "k".to_string(),
            new_value: Some("1".to_string()),
            old_value: None,
        };

        assert!(channel.post(&message).is_ok());
        channel.close();
        assert_eq!(channel.post(&message), Err(WatchError::ChannelClosed));
    }
}
