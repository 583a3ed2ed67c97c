//! Engagement Tracker — per-page state machine behind the analytics events.
//!
//! Pure and deterministic: every time-dependent call takes the current
//! instant, so tests can drive it without a clock. `EngagementSession` wires
//! it to live page signals.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::active_time::ActiveTimeAccumulator;
use super::copy::copy_snippet;
use super::event::{names, TrackedEvent};
use super::milestones::{ScrollMilestones, DEFAULT_MILESTONES};
use super::sink::{dispatch, AnalyticsSink};
use crate::signals::{ScrollMetrics, Visibility};

/// Debounce window applied to scroll signals.
pub const DEFAULT_SCROLL_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct EngagementConfig {
    /// Path of the tracked page, attached to every event as `page`.
    pub page: String,
    pub milestones: Vec<u8>,
    pub scroll_debounce: Duration,
}

impl EngagementConfig {
    pub fn for_page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            milestones: DEFAULT_MILESTONES.to_vec(),
            scroll_debounce: DEFAULT_SCROLL_DEBOUNCE,
        }
    }
}

/// Tracking state for one page view.
pub struct EngagementTracker {
    page: String,
    sink: Arc<dyn AnalyticsSink>,
    milestones: ScrollMilestones,
    active_time: ActiveTimeAccumulator,
    /// Set by `on_unload`; later signals are ignored.
    unloaded: bool,
}

impl std::fmt::Debug for EngagementTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngagementTracker")
            .field("page", &self.page)
            .field("milestones", &self.milestones)
            .field("active_time", &self.active_time)
            .field("unloaded", &self.unloaded)
            .finish_non_exhaustive()
    }
}

impl EngagementTracker {
    /// Creates the tracker for a freshly mounted page and emits `page_viewed`.
    pub fn mount(config: &EngagementConfig, sink: Arc<dyn AnalyticsSink>, now: Instant) -> Self {
        let tracker = Self {
            page: config.page.clone(),
            sink,
            milestones: ScrollMilestones::new(config.milestones.iter().copied()),
            active_time: ActiveTimeAccumulator::started_at(now),
            unloaded: false,
        };
        tracker.emit(TrackedEvent::new(names::PAGE_VIEWED));
        tracker
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    /// Emits one `scroll_depth` event per newly crossed milestone, ascending.
    /// Returns the number of events emitted.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> usize {
        if self.unloaded {
            return 0;
        }
        let Some(percent) = metrics.percent() else {
            return 0;
        };

        let crossed = self.milestones.check(percent);
        for depth in &crossed {
            self.emit(TrackedEvent::new(names::SCROLL_DEPTH).with("depth", *depth));
        }
        crossed.len()
    }

    pub fn on_visibility(&mut self, visibility: Visibility, now: Instant) {
        if self.unloaded {
            return;
        }
        debug!(page = %self.page, ?visibility, "visibility changed");
        match visibility {
            Visibility::Hidden => self.active_time.pause(now),
            Visibility::Visible => self.active_time.resume(now),
        }
    }

    /// Emits `text_copied` for a non-empty selection. Returns whether it did.
    pub fn on_copy(&self, selection: &str) -> bool {
        if self.unloaded {
            return false;
        }
        match copy_snippet(selection) {
            Some(snippet) => {
                self.emit(TrackedEvent::new(names::TEXT_COPIED).with("snippet", snippet));
                true
            }
            None => false,
        }
    }

    /// Flushes active time. Emits `active_time_spent` at most once per page
    /// view, and only for a non-zero total. Scroll, visibility and copy
    /// signals are ignored from here on.
    pub fn on_unload(&mut self, now: Instant) -> Option<Duration> {
        self.unloaded = true;
        let total = self.active_time.flush(now)?;
        let millis = i64::try_from(total.as_millis()).unwrap_or(i64::MAX);
        let seconds = total.as_secs_f64().round() as i64;
        self.emit(
            TrackedEvent::new(names::ACTIVE_TIME_SPENT)
                .with("seconds", seconds)
                .with("milliseconds", millis),
        );
        Some(total)
    }

    fn emit(&self, event: TrackedEvent) {
        dispatch(self.sink.as_ref(), event.with("page", self.page.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::event::AttrValue;
    use crate::engagement::sink::MemorySink;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn mounted(page: &str) -> (EngagementTracker, MemorySink, Instant) {
        let sink = MemorySink::new();
        let now = Instant::now();
        let tracker =
            EngagementTracker::mount(&EngagementConfig::for_page(page), Arc::new(sink.clone()), now);
        (tracker, sink, now)
    }

    fn depths(sink: &MemorySink) -> Vec<AttrValue> {
        sink.named(names::SCROLL_DEPTH)
            .into_iter()
            .filter_map(|e| e.attr("depth").cloned())
            .collect()
    }

    #[test]
    fn test_mount_emits_single_page_view() {
        let (_tracker, sink, _) = mounted("/about");
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::PAGE_VIEWED);
        assert_eq!(events[0].attr("page"), Some(&AttrValue::Text("/about".into())));
    }

    #[test]
    fn test_scroll_milestones_fire_once_in_order() {
        let (mut tracker, sink, _) = mounted("/case-studies");

        assert_eq!(tracker.on_scroll(ScrollMetrics::new(600.0, 2000.0, 1000.0)), 2);
        assert_eq!(depths(&sink), vec![AttrValue::Int(25), AttrValue::Int(50)]);

        assert_eq!(tracker.on_scroll(ScrollMetrics::new(800.0, 2000.0, 1000.0)), 1);
        assert_eq!(tracker.on_scroll(ScrollMetrics::new(100.0, 2000.0, 1000.0)), 0);
        assert_eq!(tracker.on_scroll(ScrollMetrics::new(800.0, 2000.0, 1000.0)), 0);
        assert_eq!(
            depths(&sink),
            vec![AttrValue::Int(25), AttrValue::Int(50), AttrValue::Int(75)]
        );
    }

    #[test]
    fn test_unscrollable_page_never_reports_depth() {
        let (mut tracker, sink, _) = mounted("/contact");
        assert_eq!(tracker.on_scroll(ScrollMetrics::new(0.0, 700.0, 900.0)), 0);
        assert!(sink.named(names::SCROLL_DEPTH).is_empty());
    }

    #[test]
    fn test_active_time_excludes_hidden_period() {
        let (mut tracker, sink, t0) = mounted("/insights/cloud-costs");

        tracker.on_visibility(Visibility::Hidden, t0 + ms(3000));
        tracker.on_visibility(Visibility::Visible, t0 + ms(8000));
        let total = tracker.on_unload(t0 + ms(10_000));

        assert_eq!(total, Some(ms(5000)));
        let events = sink.named(names::ACTIVE_TIME_SPENT);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].attr("seconds"), Some(&AttrValue::Int(5)));
        assert_eq!(events[0].attr("milliseconds"), Some(&AttrValue::Int(5000)));
    }

    #[test]
    fn test_unload_twice_reports_once() {
        let (mut tracker, sink, t0) = mounted("/");
        tracker.on_unload(t0 + ms(1200));
        tracker.on_unload(t0 + ms(4000));
        assert_eq!(sink.named(names::ACTIVE_TIME_SPENT).len(), 1);
    }

    #[test]
    fn test_signals_after_unload_are_ignored() {
        let (mut tracker, sink, t0) = mounted("/careers");
        tracker.on_unload(t0 + ms(2000));
        assert!(tracker.is_unloaded());

        assert_eq!(tracker.on_scroll(ScrollMetrics::new(1000.0, 2000.0, 1000.0)), 0);
        assert!(!tracker.on_copy("Senior Data Engineer"));
        tracker.on_visibility(Visibility::Visible, t0 + ms(3000));

        assert!(sink.named(names::SCROLL_DEPTH).is_empty());
        assert!(sink.named(names::TEXT_COPIED).is_empty());
        assert_eq!(tracker.on_unload(t0 + ms(9000)), None);
    }

    #[test]
    fn test_copy_reports_truncated_snippet() {
        let (tracker, sink, _) = mounted("/insights");
        let selection = "x".repeat(150);

        assert!(tracker.on_copy(&selection));
        assert!(!tracker.on_copy(""));

        let events = sink.named(names::TEXT_COPIED);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].attr("snippet"),
            Some(&AttrValue::Text(format!("{}...", "x".repeat(100))))
        );
    }
}
