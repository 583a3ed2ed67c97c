//! Page Signals — the browser-level hooks a page exposes to its components.
//!
//! Scroll, visibility change, copy and unload are modelled as a per-page hub
//! with explicit subscribe/unsubscribe pairs. A `Subscription` removes its
//! listener when dropped, so a component that owns its subscriptions cannot
//! leak listeners across navigations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

// ────────────────────────────────────────────────────────────────────────────
// Signal payloads
// ────────────────────────────────────────────────────────────────────────────

/// Scroll geometry sampled from the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, document_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            document_height,
            viewport_height,
        }
    }

    /// Scroll depth as a percentage in `0.0..=100.0`.
    /// Returns `None` when the page cannot scroll.
    pub fn percent(&self) -> Option<f64> {
        let scrollable = self.document_height - self.viewport_height;
        if scrollable <= 0.0 || !scrollable.is_finite() {
            return None;
        }
        Some((self.scroll_y / scrollable * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageSignal {
    Scroll(ScrollMetrics),
    VisibilityChanged(Visibility),
    /// A copy action inside the tracked content region, with the selected text.
    Copy { selection: String },
    Unload,
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

type Listener = Arc<dyn Fn(&PageSignal) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Listener>>,
}

impl Registry {
    fn listeners(&self) -> MutexGuard<'_, BTreeMap<u64, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Signal hub for a single page view. Cheap to clone; clones share listeners.
#[derive(Clone, Default)]
pub struct PageSignals {
    registry: Arc<Registry>,
}

impl std::fmt::Debug for PageSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSignals")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PageSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`; it stays registered until the returned
    /// `Subscription` is dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PageSignal) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.listeners().insert(id, Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `signal` to every live listener in subscription order.
    ///
    /// Listeners run outside the registry lock, so they may subscribe or
    /// unsubscribe while handling a signal.
    pub fn emit(&self, signal: PageSignal) {
        let snapshot: Vec<Listener> = self.registry.listeners().values().cloned().collect();
        for listener in snapshot {
            listener(&signal);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners().len()
    }
}

/// Handle for one registered listener. Dropping it unsubscribes.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners().remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_percent_of_scrollable_height() {
        let metrics = ScrollMetrics::new(600.0, 2000.0, 1000.0);
        assert_eq!(metrics.percent(), Some(60.0));
    }

    #[test]
    fn test_percent_none_when_page_not_scrollable() {
        assert_eq!(ScrollMetrics::new(0.0, 800.0, 800.0).percent(), None);
        assert_eq!(ScrollMetrics::new(0.0, 600.0, 800.0).percent(), None);
    }

    #[test]
    fn test_percent_clamps_overscroll() {
        assert_eq!(ScrollMetrics::new(1200.0, 2000.0, 1000.0).percent(), Some(100.0));
        assert_eq!(ScrollMetrics::new(-40.0, 2000.0, 1000.0).percent(), Some(0.0));
    }

    #[test]
    fn test_emit_reaches_subscribers_until_dropped() {
        let signals = PageSignals::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let subscription = signals.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signals.emit(PageSignal::Unload);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signals.listener_count(), 1);

        drop(subscription);
        signals.emit(PageSignal::Unload);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signals.listener_count(), 0);
    }

    #[test]
    fn test_unsubscribe_only_removes_own_listener() {
        let signals = PageSignals::new();
        let first = signals.subscribe(|_| {});
        let _second = signals.subscribe(|_| {});

        first.unsubscribe();
        assert_eq!(signals.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_hub_is_harmless() {
        let signals = PageSignals::new();
        let subscription = signals.subscribe(|_| {});
        drop(signals);
        drop(subscription);
    }
}
