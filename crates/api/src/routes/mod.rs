//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod invoices;
pub mod transactions;
pub mod webhook;
pub mod wholesale;

/// Creates the API router with all routes.
///
/// Routes that act on behalf of a user take the `CurrentActor` extractor;
/// the webhook authenticates by signature instead.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(transactions::routes())
        .merge(invoices::routes())
        .merge(wholesale::routes())
        .merge(webhook::routes())
}
