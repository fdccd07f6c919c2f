//! Tourbook API Server
//!
//! Main entry point for the reconciliation engine service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tourbook_api::{AppState, create_router};
use tourbook_core::webhook::SignatureVerifier;
use tourbook_db::{BusinessClock, connect_with};
use tourbook_shared::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tourbook=debug,tower_http=debug".into());

    // LOG_FORMAT=json for log shippers, human-readable otherwise.
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let verify_webhooks = config.webhook_verification_enabled();
    if !verify_webhooks {
        warn!("Webhook signature verification is disabled");
    }

    let clock = BusinessClock::from_name(&config.business.time_zone).with_context(|| {
        format!("Unknown business time zone {}", config.business.time_zone)
    })?;
    info!(time_zone = %clock.time_zone(), "Business calendar");

    let state = AppState {
        db: Arc::new(db),
        webhook_verifier: Arc::new(SignatureVerifier::new(&config.webhook.secret)),
        verify_webhooks,
        clock,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
