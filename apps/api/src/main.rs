use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use site_api::config::Config;
use site_api::relay::{DisabledForwarder, HttpWebhookForwarder, WebhookForwarder};
use site_api::routes::build_router;
use site_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("site_api={},tower_http=info", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting site API v{}", env!("CARGO_PKG_VERSION"));

    let forwarder = build_forwarder(&config)?;

    let state = AppState {
        config: config.clone(),
        forwarder,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the webhook backend: HTTP when WEBHOOK_URL is set, disabled otherwise.
fn build_forwarder(config: &Config) -> Result<Arc<dyn WebhookForwarder>> {
    match &config.webhook_url {
        Some(url) => {
            let forwarder = HttpWebhookForwarder::new(
                url.clone(),
                Duration::from_secs(config.webhook_timeout_secs),
            )
            .context("failed to build webhook HTTP client")?;
            info!("Chat relay forwarding to {url}");
            Ok(Arc::new(forwarder))
        }
        None => {
            warn!("WEBHOOK_URL not set; chat relay will acknowledge without forwarding");
            Ok(Arc::new(DisabledForwarder))
        }
    }
}
