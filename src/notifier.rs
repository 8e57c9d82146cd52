use crate::domain::watch::{
    ChangeEvent, Codec, Debounced, Diagnostics, Handler, JsonCodec, Registry, RelayMessage,
    StorageChange, StorageEvent, WatchConfig, WatchError,
};
use crate::interceptor::{intercept, ChangeSink, InterceptedStorage};
use crate::platform::Platform;
use crate::ports::{RelayChannel, StoragePort, Subscription};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Resources held between `init` and `destroy`.
struct Session {
    storage: Arc<InterceptedStorage>,
    channel: Option<Arc<dyn RelayChannel>>,
    _storage_events: Option<Box<dyn Subscription>>,
}

impl Session {
    fn close(self) {
        self.storage.detach();
        if let Some(channel) = &self.channel {
            channel.close();
        }
    }
}

struct Core<T> {
    config: WatchConfig,
    platform: Platform,
    codec: Arc<dyn Codec<T>>,
    registry: Registry<T>,
    diagnostics: Diagnostics,
    session: Mutex<Option<Session>>,
}

impl<T> Core<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn decode(&self, key: &str, raw: Option<String>) -> Option<T> {
        let raw = raw?;
        match self.codec.decode(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                self.diagnostics
                    .debug(&format!("Failed to parse value for key {key}: {e}"));
                None
            }
        }
    }

    fn dispatch(&self, change: &StorageChange) {
        let event = ChangeEvent {
            key: change.key.clone(),
            new_value: self.decode(&change.key, change.new_value.clone()),
            old_value: self.decode(&change.key, change.old_value.clone()),
        };
        self.registry.dispatch(&event, &self.diagnostics);
    }

    fn publish(&self, change: StorageChange) {
        let channel = self
            .session
            .lock()
            .as_ref()
            .and_then(|session| session.channel.clone());

        if let Some(channel) = channel {
            if let Err(e) = channel.post(&RelayMessage::from(change)) {
                self.diagnostics.debug(&format!("Storage change error: {e}"));
            }
        }
    }

    // Changes from other contexts are dispatched but never re-published.
    fn remote_change(&self, message: RelayMessage) {
        self.dispatch(&StorageChange::from(message));
    }

    // The events adapter only reports the area the platform's store lives in.
    fn storage_event(&self, event: StorageEvent) {
        let Some(key) = event.key else {
            self.diagnostics.debug("Ignoring storage clear event");
            return;
        };
        self.dispatch(&StorageChange::new(key, event.new_value, event.old_value));
    }
}

impl<T> ChangeSink for Core<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn local_change(&self, change: StorageChange) {
        self.dispatch(&change);
        self.publish(change);
    }
}

impl<T> Drop for Core<T> {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.close();
        }
    }
}

/// Watches one storage area for changes made in this context or any other
/// context sharing it, and fans them out to per-key handlers.
///
/// Clones share the same registry and session. Dropping the last clone
/// tears the session down as `destroy` would.
pub struct ChangeNotifier<T> {
    core: Arc<Core<T>>,
}

impl<T> Clone for ChangeNotifier<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> ChangeNotifier<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Notifier storing values as JSON.
    pub fn new(platform: Platform, config: WatchConfig) -> Self {
        Self::with_codec(platform, config, JsonCodec::new())
    }
}

impl<T> ChangeNotifier<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn with_codec<C>(platform: Platform, config: WatchConfig, codec: C) -> Self
    where
        C: Codec<T> + 'static,
    {
        let diagnostics = Diagnostics::new(platform.logger(), config.debug);
        Self {
            core: Arc::new(Core {
                registry: Registry::new(config.max_listeners_per_key),
                codec: Arc::new(codec),
                diagnostics,
                platform,
                config,
                session: Mutex::new(None),
            }),
        }
    }

    /// Starts intercepting writes, opens the relay channel and subscribes to
    /// native storage events. A second call before `destroy` only warns.
    pub fn init(&self) {
        let mut session = self.core.session.lock();
        if session.is_some() {
            self.core.diagnostics.warn("Already initialized");
            return;
        }

        let core = &self.core;
        let sink: Weak<Core<T>> = Arc::downgrade(core);
        let sink: Weak<dyn ChangeSink> = sink;
        let storage = intercept(core.platform.storage(), sink);

        let weak = Arc::downgrade(core);
        let channel: Option<Arc<dyn RelayChannel>> = core
            .platform
            .relay()
            .open(
                &core.config.channel_name,
                Box::new(move |message: RelayMessage| {
                    if let Some(core) = weak.upgrade() {
                        core.remote_change(message);
                    }
                }),
            )
            .map(Arc::from)
            .map_err(|e| {
                core.diagnostics
                    .warn(&format!("Failed to open relay channel: {e}"))
            })
            .ok();

        let weak = Arc::downgrade(core);
        let storage_events = core
            .platform
            .storage_events()
            .subscribe(Box::new(move |event: StorageEvent| {
                if let Some(core) = weak.upgrade() {
                    core.storage_event(event);
                }
            }))
            .map_err(|e| {
                core.diagnostics
                    .warn(&format!("Failed to subscribe to storage events: {e}"))
            })
            .ok();

        *session = Some(Session {
            storage,
            channel,
            _storage_events: storage_events,
        });
        core.diagnostics.debug(&format!(
            "Initialized on channel {}",
            core.config.channel_name
        ));
    }

    /// Closes the relay channel, detaches the interceptor and the storage
    /// event listener, and drops every registration.
    pub fn destroy(&self) {
        let session = self.core.session.lock().take();
        let Some(session) = session else {
            self.core.diagnostics.warn("Not initialized");
            return;
        };
        session.close();
        self.core.registry.clear();
        self.core.diagnostics.debug("Destroyed");
    }

    pub fn enable_debug(&self) {
        self.core.diagnostics.enable_debug();
    }

    pub fn is_debug(&self) -> bool {
        self.core.diagnostics.is_debug()
    }

    pub fn is_initialized(&self) -> bool {
        self.core.session.lock().is_some()
    }

    /// Registers `handler` for `key`. Returns `false` (and warns) when the
    /// key already holds the maximum number of handlers.
    pub fn watch<F>(&self, key: &str, handler: F) -> bool
    where
        F: Fn(Option<&T>, Option<&T>) + Send + Sync + 'static,
    {
        self.register(key, Arc::new(handler))
    }

    /// Like [`watch`](Self::watch), but the handler only sees the last change
    /// of a burst, `delay` after it. `None` uses the configured default.
    pub fn watch_with_debounce<F>(&self, key: &str, handler: F, delay: Option<Duration>) -> bool
    where
        F: Fn(Option<&T>, Option<&T>) + Send + Sync + 'static,
    {
        let delay = delay.unwrap_or_else(|| self.core.config.debounce_delay());
        let debounced = Debounced::new(
            key,
            Arc::new(handler),
            self.core.platform.timers(),
            delay,
            self.core.diagnostics.clone(),
        );
        self.register(key, debounced.into_handler())
    }

    fn register(&self, key: &str, handler: Handler<T>) -> bool {
        let registered = self.core.registry.register_handler(key, handler);
        if !registered {
            self.core
                .diagnostics
                .warn(&format!("Exceeded maximum listeners for key {key}"));
        }
        registered
    }

    /// Removes every handler for `key`, cancelling pending debounced calls.
    pub fn unwatch(&self, key: &str) {
        self.core.registry.remove_key(key);
    }

    pub fn clear_watchers(&self) {
        self.core.registry.clear();
    }

    pub fn handler_count(&self, key: &str) -> usize {
        self.core.registry.handler_count(key)
    }

    /// The store to write through: intercepted while initialized, the
    /// original otherwise.
    pub fn storage(&self) -> Arc<dyn StoragePort> {
        match self.core.session.lock().as_ref() {
            Some(session) => session.storage.clone(),
            None => self.core.platform.storage(),
        }
    }

    /// Encodes `value` and writes it through [`storage`](Self::storage).
    pub fn write(&self, key: &str, value: &T) -> Result<(), WatchError> {
        let raw = self.core.codec.encode(value)?;
        self.storage().set_item(key, &raw)
    }

    /// Reads and decodes `key`. Unlike dispatch, a corrupt value is an
    /// error here rather than `None`.
    pub fn read(&self, key: &str) -> Result<Option<T>, WatchError> {
        self.storage()
            .get_item(key)?
            .map(|raw| self.core.codec.decode(&raw))
            .transpose()
    }

    pub fn remove(&self, key: &str) -> Result<(), WatchError> {
        self.storage().remove_item(key)
    }

    pub fn config(&self) -> &WatchConfig {
        &self.core.config
    }
}
