//! Analytics sinks — where tracked events go.
//!
//! Dispatch is fire-and-forget: the tracker never inspects an outcome, and a
//! sink that panics is contained in `dispatch` so the remaining signals keep
//! working.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use super::event::TrackedEvent;

/// Receives tracked events. Carried by the tracker as `Arc<dyn AnalyticsSink>`.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &TrackedEvent);
}

/// Hands `event` to `sink`, swallowing any panic raised by the sink.
pub fn dispatch(sink: &dyn AnalyticsSink, event: TrackedEvent) {
    let outcome = catch_unwind(AssertUnwindSafe(|| sink.track(&event)));
    if outcome.is_err() {
        warn!(event = %event.name, "analytics sink panicked; event dropped");
    }
}

/// Writes every event to the `tracing` log. Default sink for server-side use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn track(&self, event: &TrackedEvent) {
        info!(
            event = %event.name,
            attributes = ?event.attributes,
            "analytics event"
        );
    }
}

/// Keeps events in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<TrackedEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events with the given name, in emission order.
    pub fn named(&self, name: &str) -> Vec<TrackedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalyticsSink for MemorySink {
    fn track(&self, event: &TrackedEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
