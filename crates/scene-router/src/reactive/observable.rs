#![forbid(unsafe_code)]

//! Thread-safe observable value.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use arc_swap::ArcSwap;

type Callback<T> = dyn Fn(&T) + Send + Sync;

struct ObservableInner<T> {
    value: ArcSwap<T>,
    version: AtomicU64,
    /// Registration-ordered; dead entries are pruned during `notify`.
    subscribers: Mutex<Vec<Weak<Callback<T>>>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** value.
pub struct Observable<T> {
    inner: Arc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.load())
            .field("version", &self.inner.version.load(Ordering::Acquire))
            .finish()
    }
}

impl<T: Default + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Create an observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(ObservableInner {
                value: ArcSwap::from_pointee(value),
                version: AtomicU64::new(0),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> Arc<T> {
        self.inner.value.load_full()
    }

    /// Run `f` against the current value without cloning the `Arc`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.load())
    }

    /// Number of `set` calls so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Publish a new value and notify subscribers.
    pub fn set(&self, value: T) {
        let value = Arc::new(value);
        self.inner.value.store(Arc::clone(&value));
        self.inner.version.fetch_add(1, Ordering::AcqRel);
        self.notify(&value);
    }

    /// Register `callback` to run after every [`set`](Self::set).
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        callback: impl Fn(&T) + Send + Sync + 'static,
    ) -> Subscription {
        let strong: Arc<Callback<T>> = Arc::new(callback);
        self.lock_subscribers().push(Arc::downgrade(&strong));
        Subscription {
            _callback: Box::new(strong),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn notify(&self, value: &T) {
        // Upgrade under the lock, call outside it, so callbacks may subscribe
        // or read without deadlocking.
        let live: Vec<Arc<Callback<T>>> = {
            let mut subscribers = self.lock_subscribers();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in live {
            callback(value);
        }
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<Weak<Callback<T>>>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII guard for an [`Observable::subscribe`] callback.
///
/// Dropping the guard unsubscribes.
pub struct Subscription {
    _callback: Box<dyn Any + Send + Sync>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
