//! Engagement Session — binds an `EngagementTracker` to a page's live signals.
//!
//! `attach` is the mount step: it emits the page view, subscribes to the
//! page's signals and debounces scroll. Dropping the session (or calling
//! `detach`) is the unmount step: the subscription is released, any pending
//! debounced scroll check is cancelled, and active time gets a best-effort
//! final flush if the page never reported an unload.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;
use tracing::debug;

use super::sink::AnalyticsSink;
use super::tracker::{EngagementConfig, EngagementTracker};
use crate::debounce::Debouncer;
use crate::signals::{PageSignal, PageSignals, ScrollMetrics, Subscription};

type SharedTracker = Arc<Mutex<EngagementTracker>>;

fn lock(tracker: &SharedTracker) -> MutexGuard<'_, EngagementTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct EngagementSession {
    // Field order matters on drop: the listener goes first, then the debouncer.
    subscription: Option<Subscription>,
    scroll: Debouncer<ScrollMetrics>,
    tracker: SharedTracker,
}

impl EngagementSession {
    /// Mounts tracking for one page view. Must be called inside a tokio runtime;
    /// signals may then be emitted from any thread.
    pub fn attach(
        signals: &PageSignals,
        config: EngagementConfig,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let tracker: SharedTracker = Arc::new(Mutex::new(EngagementTracker::mount(
            &config,
            sink,
            Instant::now(),
        )));

        let scroll = {
            let tracker = Arc::clone(&tracker);
            Debouncer::new(config.scroll_debounce, move |metrics: ScrollMetrics| {
                lock(&tracker).on_scroll(metrics);
            })
        };

        let subscription = {
            let tracker = Arc::clone(&tracker);
            let scroll = scroll.clone();
            signals.subscribe(move |signal| match signal {
                PageSignal::Scroll(metrics) => scroll.call(*metrics),
                PageSignal::VisibilityChanged(visibility) => {
                    lock(&tracker).on_visibility(*visibility, Instant::now());
                }
                PageSignal::Copy { selection } => {
                    lock(&tracker).on_copy(selection);
                }
                PageSignal::Unload => {
                    scroll.cancel();
                    lock(&tracker).on_unload(Instant::now());
                }
            })
        };

        debug!(page = %config.page, "engagement tracking attached");
        Self {
            subscription: Some(subscription),
            scroll,
            tracker,
        }
    }

    pub fn page(&self) -> String {
        lock(&self.tracker).page().to_string()
    }

    /// Unmounts tracking. Equivalent to dropping the session.
    pub fn detach(self) {}
}

impl Drop for EngagementSession {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.scroll.cancel();
        let mut tracker = lock(&self.tracker);
        tracker.on_unload(Instant::now());
        debug!(page = %tracker.page(), "engagement tracking detached");
    }
}
