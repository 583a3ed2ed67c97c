// Engagement Analytics Tracker
// Page views, scroll depth milestones, active (foreground) time and text copies,
// reported as named events through a single fire-and-forget sink.

pub mod active_time;
pub mod copy;
pub mod event;
pub mod milestones;
pub mod session;
pub mod sink;
pub mod tracker;

pub use event::{names, AttrValue, TrackedEvent};
pub use session::EngagementSession;
pub use sink::{AnalyticsSink, LogSink, MemorySink};
pub use tracker::{EngagementConfig, EngagementTracker};
