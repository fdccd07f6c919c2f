//! Payment-gateway webhook.
//!
//! The body is read as raw bytes because the signature covers the exact
//! bytes the gateway sent.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use tourbook_core::webhook::{GatewayEvent, ReconcileCommand, SIGNATURE_HEADER};

use crate::{AppState, error::ApiResult};

/// Creates the webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payment-gateway/webhook", post(receive_webhook))
}

fn acknowledged() -> Json<Value> {
    Json(json!({ "received": true }))
}

/// POST `/payment-gateway/webhook` - Apply a gateway event.
///
/// Returns 401 for bad signatures. Payload problems are logged and
/// acknowledged so the gateway stops redelivering them; processing errors
/// are surfaced so it retries.
async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    if state.verify_webhooks {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        if let Err(e) = state.webhook_verifier.verify(&body, signature) {
            warn!(error = %e, "Rejected webhook delivery");
            return Err(e.into());
        }
    }

    let command = match GatewayEvent::parse(&body).and_then(|event| {
        info!(event = %event.event, charge_id = %event.data.id, "Webhook received");
        ReconcileCommand::from_event(&event)
    }) {
        Ok(command) => command,
        Err(e) if e.is_acknowledged() => {
            warn!(error = %e, "Acknowledging malformed webhook payload");
            return Ok(acknowledged());
        }
        Err(e) => return Err(e.into()),
    };

    let outcome = state.reconciliation()
        .reconcile(command)
        .await?;

    info!(outcome = outcome.as_str(), "Webhook processed");
    Ok(Json(json!({ "received": true, "outcome": outcome })))
}
