//! Axum route handler for the chat relay.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::forwarder::ForwardPayload;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub prompt: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub queued: bool,
    pub session_id: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chat
///
/// Queues a prompt for the chat webhook and answers immediately. The forward
/// runs detached: its outcome is logged and never reaches the caller.
pub async fn handle_relay(
    State(state): State<AppState>,
    body: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("invalid request body: {e}")))?;

    let prompt = request
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("prompt is required".to_string()))?;

    let session_id = request
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let payload = ForwardPayload {
        session_id: session_id.clone(),
        chat_input: prompt,
    };
    let forwarder = state.forwarder.clone();
    tokio::spawn(async move {
        if let Err(e) = forwarder.forward(&payload).await {
            error!(session_id = %payload.session_id, "webhook forward failed: {e}");
        }
    });

    info!(session_id = %session_id, "chat prompt queued");
    Ok(Json(RelayResponse {
        queued: true,
        session_id,
    }))
}
