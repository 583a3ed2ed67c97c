use std::sync::Arc;

use crate::config::Config;
use crate::relay::WebhookForwarder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable webhook delivery. `HttpWebhookForwarder` when WEBHOOK_URL is set,
    /// `DisabledForwarder` otherwise.
    pub forwarder: Arc<dyn WebhookForwarder>,
}
