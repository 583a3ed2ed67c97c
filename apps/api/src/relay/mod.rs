// Chat relay: accepts a prompt, answers at once, forwards to the chat webhook
// in the background. No retries; forward failures are logged only.

pub mod forwarder;
pub mod handlers;

pub use forwarder::{
    DisabledForwarder, ForwardPayload, HttpWebhookForwarder, RelayError, WebhookForwarder,
};
