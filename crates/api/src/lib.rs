//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for transactions, invoices and gateway webhooks
//! - The acting-user extractor
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tourbook_core::webhook::SignatureVerifier;
use tourbook_db::{
    BusinessClock, InvoiceRepository, ReconciliationRepository, TransactionRepository,
    WholesaleTransactionRepository,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Verifier for payment-gateway webhook signatures.
    pub webhook_verifier: Arc<SignatureVerifier>,
    /// Whether webhook signatures are checked.
    pub verify_webhooks: bool,
    /// Business calendar for document periods.
    pub clock: BusinessClock,
}

impl AppState {
    /// Customer transaction repository.
    #[must_use]
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new((*self.db).clone()).with_clock(self.clock)
    }

    /// Invoice repository.
    #[must_use]
    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new((*self.db).clone()).with_clock(self.clock)
    }

    /// Wholesale transaction repository.
    #[must_use]
    pub fn wholesale(&self) -> WholesaleTransactionRepository {
        WholesaleTransactionRepository::new((*self.db).clone()).with_clock(self.clock)
    }

    /// Gateway reconciliation repository.
    #[must_use]
    pub fn reconciliation(&self) -> ReconciliationRepository {
        ReconciliationRepository::new((*self.db).clone()).with_clock(self.clock)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
