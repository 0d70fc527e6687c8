//! Observable value cell.
//!
//! A [`Store`] holds one value and a list of observers. Every `set` or
//! `update` notifies all current observers synchronously, in subscription
//! order, after the value has been written and with no lock held. Observers
//! may read or write the store from inside their callback.
//!
//! Every write bumps a version. An observer is never handed a value older than
//! one it has already been handed, so a write racing `subscribe` on another
//! thread is not followed by the stale initial value. Writers on different
//! threads may still run the same observer concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Observer<T> {
    id: u64,
    /// Highest version delivered to this observer.
    delivered: Arc<AtomicU64>,
    callback: Callback<T>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            delivered: Arc::clone(&self.delivered),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> Observer<T> {
    fn deliver(&self, version: u64, value: &T) {
        if self.delivered.fetch_max(version, Ordering::SeqCst) < version {
            (self.callback)(value);
        }
    }
}

struct Versioned<T> {
    version: u64,
    value: T,
}

struct Inner<T> {
    value: RwLock<Versioned<T>>,
    observers: Mutex<Vec<Observer<T>>>,
    next_id: AtomicU64,
}

impl<T> Inner<T> {
    fn remove_observer(&self, id: u64) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|observer| observer.id != id);
    }
}

/// Shared, observable value. Cloning yields another handle to the same cell.
pub struct Store<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(Versioned {
                    version: 1,
                    value: initial,
                }),
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.read(T::clone)
    }

    /// Borrows the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self
            .inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard.value)
    }

    /// Replaces the value and notifies observers.
    pub fn set(&self, value: T) {
        self.update(move |current| *current = value);
    }

    /// Computes the next value from the previous one in place, then notifies
    /// observers.
    ///
    /// `f` runs under the store's write lock: it must not read or write this
    /// store, through this handle or a clone. Observers run after the lock is
    /// released and have no such restriction.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (version, snapshot) = {
            let mut guard = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut guard.value);
            guard.version += 1;
            (guard.version, guard.value.clone())
        };
        self.notify(version, &snapshot);
    }

    /// Registers an observer. It is called immediately with the current value
    /// and again after every change until the returned [`Subscription`] is
    /// dropped or unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let observer = Observer {
            id,
            delivered: Arc::new(AtomicU64::new(0)),
            callback: Arc::new(callback),
        };

        // Registered before the snapshot is taken: a write that lands after
        // the snapshot will include this observer in its notification.
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer.clone());

        let (version, current) = self.snapshot();
        observer.deliver(version, &current);

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove_observer(id);
                }
            })),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn snapshot(&self) -> (u64, T) {
        let guard = self
            .inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        (guard.version, guard.value.clone())
    }

    fn notify(&self, version: u64, value: &T) {
        let observers: Vec<Observer<T>> = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        tracing::trace!(
            observers = observers.len(),
            version,
            "Notifying store observers"
        );

        for observer in observers {
            observer.deliver(version, value);
        }
    }
}

/// Handle returned by [`Store::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keeps the observer registered for as long as the store lives.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
