use std::time::Duration;

use tokio::time::Instant;

/// Foreground time for one page view, built from visible segments.
///
/// Hidden periods are never counted. `flush` reports the total once.
#[derive(Debug, Clone)]
pub struct ActiveTimeAccumulator {
    total: Duration,
    segment_start: Option<Instant>,
    flushed: bool,
}

impl ActiveTimeAccumulator {
    /// Starts timing immediately; pages mount in the foreground.
    pub fn started_at(now: Instant) -> Self {
        Self {
            total: Duration::ZERO,
            segment_start: Some(now),
            flushed: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.segment_start.is_some()
    }

    /// Closes the running segment. No-op while already paused.
    pub fn pause(&mut self, now: Instant) {
        if let Some(start) = self.segment_start.take() {
            self.total += now.saturating_duration_since(start);
        }
    }

    /// Opens a new segment. No-op while already running.
    pub fn resume(&mut self, now: Instant) {
        if self.segment_start.is_none() && !self.flushed {
            self.segment_start = Some(now);
        }
    }

    /// Total including the running segment, without modifying state.
    pub fn total_at(&self, now: Instant) -> Duration {
        let running = self
            .segment_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        self.total + running
    }

    /// Stops the clock and returns the final total, once.
    /// Returns `None` on repeat calls or when no time was accumulated.
    pub fn flush(&mut self, now: Instant) -> Option<Duration> {
        if self.flushed {
            return None;
        }
        self.pause(now);
        self.flushed = true;
        Some(self.total).filter(|total| !total.is_zero())
    }
}
