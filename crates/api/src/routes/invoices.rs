//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tourbook_core::ledger::InvoiceStatus;
use tourbook_db::entities::invoices;
use tourbook_db::repositories::{CreateInvoiceInput, InvoiceRepository};
use tourbook_shared::Amount;
use tourbook_shared::types::{InvoiceId, QuotationId};

use crate::{AppState, error::ApiResult, middleware::CurrentActor};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", post(create_invoice))
        .route("/invoices/{invoice_id}", get(get_invoice))
        .route(
            "/invoices/{invoice_id}/tax-invoice",
            post(issue_tax_invoice).delete(cancel_tax_invoice),
        )
}

/// Request body for issuing an invoice.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Quotation being billed.
    pub quotation_id: QuotationId,
    /// Grand total.
    pub grand_total: Amount,
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number, e.g. `IVN2601-0001`.
    pub invoice_number: String,
    /// Quotation ID.
    pub quotation_id: Uuid,
    /// Grand total.
    pub grand_total: Amount,
    /// Sum of confirmed payments.
    pub paid_amount: Amount,
    /// Sum of confirmed refunds.
    pub refunded_amount: Amount,
    /// Still payable.
    pub remaining_amount: Amount,
    /// Status.
    pub status: InvoiceStatus,
    /// Whether a tax invoice is active.
    pub has_tax_invoice: bool,
    /// Tax invoice number, kept after cancellation.
    pub tax_invoice_number: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<invoices::Model> for InvoiceResponse {
    fn from(invoice: invoices::Model) -> Self {
        let balance = InvoiceRepository::balance(&invoice);
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            quotation_id: invoice.quotation_id,
            grand_total: balance.grand_total,
            paid_amount: balance.paid_amount,
            refunded_amount: balance.refunded_amount,
            remaining_amount: balance.remaining(),
            status: balance.status,
            has_tax_invoice: invoice.has_tax_invoice,
            tax_invoice_number: invoice.tax_invoice_number,
            created_at: invoice.created_at.to_rfc3339(),
        }
    }
}

/// POST `/invoices` - Issue an invoice for a quotation.
async fn create_invoice(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Json(payload): Json<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<InvoiceResponse>)> {
    let invoice = state.invoices()
        .create_invoice(CreateInvoiceInput {
            quotation_id: payload.quotation_id,
            grand_total: payload.grand_total,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(invoice.into())))
}

/// GET `/invoices/{invoice_id}` - Get an invoice with its balance.
async fn get_invoice(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(invoice_id): Path<InvoiceId>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = state.invoices()
        .find(invoice_id)
        .await?;
    Ok(Json(invoice.into()))
}

/// POST `/invoices/{invoice_id}/tax-invoice` - Issue the tax invoice.
async fn issue_tax_invoice(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(invoice_id): Path<InvoiceId>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = state.invoices()
        .issue_tax_invoice(invoice_id)
        .await?;
    Ok(Json(invoice.into()))
}

/// DELETE `/invoices/{invoice_id}/tax-invoice` - Cancel the tax invoice.
async fn cancel_tax_invoice(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(invoice_id): Path<InvoiceId>,
) -> ApiResult<Json<InvoiceResponse>> {
    let invoice = state.invoices()
        .cancel_tax_invoice(invoice_id)
        .await?;
    Ok(Json(invoice.into()))
}
