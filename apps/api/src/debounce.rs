//! Debounce — coalesces bursts of calls into one invocation per quiet window.
//!
//! Each `call` cancels the pending invocation (if any) and schedules the
//! callback with the latest value after `delay`. The runtime is captured at
//! construction, so `call` works from any thread afterwards.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

struct Inner<T> {
    delay: Duration,
    callback: Callback<T>,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Inner<T> {
    fn take_pending(&self) -> Option<JoinHandle<()>> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(task) = self.take_pending() {
            task.abort();
        }
    }
}

/// Cancelable debounced wrapper around a callback.
///
/// Clones share the same pending slot. Dropping the last clone cancels any
/// pending invocation.
pub struct Debouncer<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.inner.delay)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called inside a tokio runtime; that runtime runs the callbacks.
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                delay,
                callback: Arc::new(callback),
                runtime: Handle::current(),
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Schedules `value` for delivery, replacing anything still pending.
    pub fn call(&self, value: T) {
        let callback = Arc::clone(&self.inner.callback);
        let delay = self.inner.delay;
        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback(value);
        });

        let previous = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drops the pending invocation. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.inner.take_pending() {
            Some(task) if !task.is_finished() => {
                task.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
