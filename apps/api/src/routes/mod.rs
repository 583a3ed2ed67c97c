pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::apply::handlers::handle_apply;
use crate::relay::handlers::handle_relay;
use crate::state::AppState;

/// Method-only routes answer other verbs with 405 Method Not Allowed.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/chat", post(handle_relay))
        .route("/api/apply", post(handle_apply))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::relay::{ForwardPayload, RelayError, WebhookForwarder};

    struct ChannelForwarder {
        sent: mpsc::UnboundedSender<ForwardPayload>,
    }

    #[async_trait]
    impl WebhookForwarder for ChannelForwarder {
        async fn forward(&self, payload: &ForwardPayload) -> Result<(), RelayError> {
            let _ = self.sent.send(payload.clone());
            Ok(())
        }
    }

    struct FailingForwarder;

    #[async_trait]
    impl WebhookForwarder for FailingForwarder {
        async fn forward(&self, _payload: &ForwardPayload) -> Result<(), RelayError> {
            Err(RelayError::Status { status: 502 })
        }
    }

    fn router_with(forwarder: Arc<dyn WebhookForwarder>) -> Router {
        build_router(AppState {
            config: Config::default(),
            forwarder,
        })
    }

    fn recording_router() -> (Router, mpsc::UnboundedReceiver<ForwardPayload>) {
        let (sent, received) = mpsc::unbounded_channel();
        (router_with(Arc::new(ChannelForwarder { sent })), received)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (app, _rx) = recording_router();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_relay_generates_session_and_forwards() {
        let (app, mut forwarded) = recording_router();
        let response = app
            .oneshot(post_json("/api/chat", json!({ "prompt": "hi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["queued"], true);
        let session_id = body["sessionId"].as_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&session_id).is_ok());

        let payload = tokio::time::timeout(Duration::from_secs(1), forwarded.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload.session_id, session_id);
        assert_eq!(payload.chat_input, "hi");
    }

    #[tokio::test]
    async fn test_relay_keeps_caller_session_id() {
        let (app, mut forwarded) = recording_router();
        let response = app
            .oneshot(post_json(
                "/api/chat",
                json!({ "prompt": "follow-up", "sessionId": "s-42" }),
            ))
            .await
            .unwrap();

        assert_eq!(json_body(response).await["sessionId"], "s-42");
        let payload = tokio::time::timeout(Duration::from_secs(1), forwarded.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload.session_id, "s-42");
    }

    #[tokio::test]
    async fn test_relay_without_prompt_is_bad_request() {
        let (app, mut forwarded) = recording_router();
        let response = app.oneshot(post_json("/api/chat", json!({}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        assert!(forwarded.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_malformed_json_is_bad_request() {
        let (app, _rx) = recording_router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_relay_get_is_method_not_allowed() {
        let (app, _rx) = recording_router();
        let response = app
            .oneshot(Request::get("/api/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_relay_answers_even_when_webhook_fails() {
        let app = router_with(Arc::new(FailingForwarder));
        let response = app
            .oneshot(post_json("/api/chat", json!({ "prompt": "hi" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["queued"], true);
    }

    #[tokio::test]
    async fn test_apply_acknowledges_valid_application() {
        let (app, _rx) = recording_router();
        let response = app
            .oneshot(post_json(
                "/api/apply",
                json!({
                    "fullName": "Priya Raman",
                    "email": "priya@example.com",
                    "position": "Senior Data Engineer",
                    "coverLetter": "I have led two warehouse migrations."
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert!(body["applicationId"].is_string());
    }

    #[tokio::test]
    async fn test_apply_missing_email_is_bad_request() {
        let (app, _rx) = recording_router();
        let response = app
            .oneshot(post_json(
                "/api/apply",
                json!({ "fullName": "Priya Raman", "position": "Analyst" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apply_get_is_method_not_allowed() {
        let (app, _rx) = recording_router();
        let response = app
            .oneshot(Request::get("/api/apply").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
