//! Reactive stores
//!
//! A [`Store`] holds one shared value and pushes every replacement to its
//! subscribers. Consumers never poll for changes and never observe a partially
//! updated value: each write swaps the whole value under one lock, and
//! subscribers are notified with a snapshot after the lock is released.

use crate::sync::{isolate, lock, read, write};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

new_key_type! {
    /// Handle returned by `subscribe`
    pub struct SubscriptionId;
}

/// Subscriber callback type
pub type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct StoreInner<T> {
    value: RwLock<T>,
    /// Bumped under the value lock on every write
    version: AtomicU64,
    subscribers: Mutex<SlotMap<SubscriptionId, Subscriber<T>>>,
    closed: AtomicBool,
}

/// A shared, observable value
///
/// Cloning a store clones the handle; all clones see the same value.
///
/// A subscriber may write to the store while it is being notified. The
/// nested write is delivered to every subscriber, and the outer
/// notification pass stops, so no subscriber is left holding a value older
/// than the store's.
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                value: RwLock::new(initial),
                version: AtomicU64::new(0),
                subscribers: Mutex::new(SlotMap::with_key()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        read(&self.inner.value).clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&read(&self.inner.value))
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        let (snapshot, version) = {
            let mut current = write(&self.inner.value);
            *current = value;
            (current.clone(), self.bump())
        };
        self.publish(&snapshot, version);
    }

    /// Subscribe to changes. The callback is not invoked for the current value.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        lock(&self.inner.subscribers).insert(Arc::new(callback))
    }

    /// Remove a subscription. Returns false if it was not active.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.inner.subscribers).remove(id).is_some()
    }

    /// Drop all subscribers and stop notifying. The last value stays readable.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        lock(&self.inner.subscribers).clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Must be called with the value write lock held
    fn bump(&self) -> u64 {
        self.inner.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, version: u64) -> bool {
        self.inner.version.load(Ordering::SeqCst) == version
    }

    fn publish(&self, snapshot: &T, version: u64) {
        if self.is_closed() {
            return;
        }
        let subscribers: Vec<Subscriber<T>> =
            lock(&self.inner.subscribers).values().cloned().collect();
        for subscriber in subscribers {
            // A newer write has already been delivered to everyone
            if !self.is_current(version) {
                return;
            }
            isolate("store subscriber", || subscriber(snapshot));
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Store<T> {
    /// Replace the value only if it differs. Returns true if it changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        let (snapshot, version) = {
            let mut current = write(&self.inner.value);
            if *current == value {
                return false;
            }
            *current = value;
            (current.clone(), self.bump())
        };
        self.publish(&snapshot, version);
        true
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
