//! Webhook forwarder — pluggable, trait-based delivery of relayed chat prompts.
//!
//! Default: `HttpWebhookForwarder` (POSTs JSON to the configured webhook URL).
//! Without a configured URL, `DisabledForwarder` logs and drops the payload.
//!
//! `AppState` holds an `Arc<dyn WebhookForwarder>`, chosen at startup via config.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected payload (status {status})")]
    Status { status: u16 },
}

/// Body sent to the webhook. Field names follow the webhook's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardPayload {
    pub session_id: String,
    pub chat_input: String,
}

#[async_trait]
pub trait WebhookForwarder: Send + Sync {
    async fn forward(&self, payload: &ForwardPayload) -> Result<(), RelayError>;
}

/// Posts payloads to a fixed webhook URL. No retries.
#[derive(Clone)]
pub struct HttpWebhookForwarder {
    client: Client,
    url: String,
}

impl HttpWebhookForwarder {
    pub fn new(url: String, timeout: Duration) -> Result<Self, RelayError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
        })
    }
}

#[async_trait]
impl WebhookForwarder for HttpWebhookForwarder {
    async fn forward(&self, payload: &ForwardPayload) -> Result<(), RelayError> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
            });
        }

        debug!(session_id = %payload.session_id, "webhook accepted relayed prompt");
        Ok(())
    }
}

/// Used when no webhook URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledForwarder;

#[async_trait]
impl WebhookForwarder for DisabledForwarder {
    async fn forward(&self, payload: &ForwardPayload) -> Result<(), RelayError> {
        warn!(
            session_id = %payload.session_id,
            "WEBHOOK_URL not set; relayed prompt dropped"
        );
        Ok(())
    }
}
