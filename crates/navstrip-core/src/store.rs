//! Settings store seam and an in-memory implementation.
//!
//! Observers receive [`SettingKey`] notifications over a channel and drain
//! them on their own thread. Dropping the [`Subscription`] unregisters it.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use navstrip_types::settings::NavSettings;

/// Which setting changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Actions,
    ButtonTint,
    TintMode,
    RippleColor,
    MenuLocation,
    MenuVisibility,
    ImeArrows,
    Dim,
    CanMove,
    PolicyControl,
    NavBarShow,
}

impl SettingKey {
    /// Keys whose change requires rebuilding the rows.
    pub fn requires_rebuild(self) -> bool {
        !matches!(self, Self::NavBarShow)
    }
}

/// Live registration with a store.
pub struct Subscription {
    rx: Receiver<SettingKey>,
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap `rx`; `on_drop` unregisters the sender from its store.
    pub fn new(rx: Receiver<SettingKey>, on_drop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            rx,
            on_drop: Some(Box::new(on_drop)),
        }
    }

    /// Everything received since the last drain.
    pub fn drain(&self) -> Vec<SettingKey> {
        let mut keys = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(key) => keys.push(key),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        keys
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(f) = self.on_drop.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.on_drop.is_some())
            .finish()
    }
}

/// Persistent configuration store.
pub trait SettingsStore: Send + Sync {
    /// Current value of every setting.
    fn snapshot(&self) -> NavSettings;

    /// Register for change notifications.
    fn subscribe(&self) -> Subscription;

    /// Edit the settings and notify every subscriber of `key`.
    fn put(&self, key: SettingKey, edit: &mut dyn FnMut(&mut NavSettings));
}

#[derive(Debug, Default)]
struct Listeners {
    next_id: u64,
    senders: Vec<(u64, Sender<SettingKey>)>,
}

#[derive(Debug, Default)]
struct Shared {
    settings: Mutex<NavSettings>,
    listeners: Mutex<Listeners>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new(settings: NavSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings: Mutex::new(settings),
                listeners: Mutex::new(Listeners::default()),
            }),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.listeners).senders.len()
    }
}

impl SettingsStore for MemoryStore {
    fn snapshot(&self) -> NavSettings {
        lock(&self.shared.settings).clone()
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let id = {
            let mut listeners = lock(&self.shared.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.senders.push((id, tx));
            id
        };
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        Subscription::new(rx, move || {
            if let Some(shared) = weak.upgrade() {
                lock(&shared.listeners).senders.retain(|(sid, _)| *sid != id);
            }
        })
    }

    fn put(&self, key: SettingKey, edit: &mut dyn FnMut(&mut NavSettings)) {
        edit(&mut lock(&self.shared.settings));
        let mut listeners = lock(&self.shared.listeners);
        listeners.senders.retain(|(_, tx)| tx.send(key).is_ok());
        log::debug!(
            "Setting {key:?} changed, notified {} subscribers",
            listeners.senders.len()
        );
    }
}
