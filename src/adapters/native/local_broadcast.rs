use crate::domain::watch::error::WatchError;
use crate::domain::watch::types::RelayMessage;
use crate::ports::{MessageCallback, RelayChannel, RelayPort};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static GLOBAL_HUB: Lazy<LocalBroadcast> = Lazy::new(LocalBroadcast::new);

struct Endpoint {
    id: u64,
    on_message: Arc<MessageCallback>,
}

#[derive(Default)]
struct Hub {
    next_id: AtomicU64,
    channels: Mutex<HashMap<String, Vec<Endpoint>>>,
}

/// In-process stand-in for `BroadcastChannel`.
///
/// Endpoints opened on the same hub with the same name form one channel.
/// Delivery is synchronous and skips the posting endpoint.
#[derive(Clone, Default)]
pub struct LocalBroadcast {
    hub: Arc<Hub>,
}

impl LocalBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide hub shared by every default native platform.
    pub fn global() -> Self {
        GLOBAL_HUB.clone()
    }

    pub fn endpoint_count(&self, name: &str) -> usize {
        self.hub
            .channels
            .lock()
            .get(name)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl RelayPort for LocalBroadcast {
    fn open(
        &self,
        name: &str,
        on_message: MessageCallback,
    ) -> Result<Box<dyn RelayChannel>, WatchError> {
        let id = self.hub.next_id.fetch_add(1, Ordering::Relaxed);
        self.hub
            .channels
            .lock()
            .entry(name.to_string())
            .or_default()
            .push(Endpoint {
                id,
                on_message: Arc::new(on_message),
            });

        Ok(Box::new(LocalChannel {
            id,
            name: name.to_string(),
            hub: Arc::clone(&self.hub),
            closed: AtomicBool::new(false),
        }))
    }
}

pub struct LocalChannel {
    id: u64,
    name: String,
    hub: Arc<Hub>,
    closed: AtomicBool,
}

impl RelayChannel for LocalChannel {
    fn post(&self, message: &RelayMessage) -> Result<(), WatchError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(WatchError::ChannelClosed);
        }

        let targets: Vec<Arc<MessageCallback>> = self
            .hub
            .channels
            .lock()
            .get(&self.name)
            .map(|endpoints| {
                endpoints
                    .iter()
                    .filter(|endpoint| endpoint.id != self.id)
                    .map(|endpoint| Arc::clone(&endpoint.on_message))
                    .collect()
            })
            .unwrap_or_default();

        for on_message in targets {
            on_message(message.clone());
        }
        Ok(())
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut channels = self.hub.channels.lock();
        if let Some(endpoints) = channels.get_mut(&self.name) {
            endpoints.retain(|endpoint| endpoint.id != self.id);
            if endpoints.is_empty() {
                channels.remove(&self.name);
            }
        }
    }
}

impl Drop for LocalChannel {
    fn drop(&mut self) {
        self.close();
    }
}
