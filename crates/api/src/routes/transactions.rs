//! Customer transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use tourbook_core::transaction::{TransactionKind, TransactionStatus, UpdateAction};
use tourbook_db::entities::customer_transactions;
use tourbook_db::repositories::{
    CreateTransactionInput, EditTransactionInput, GatewayConfirmation,
};
use tourbook_shared::Amount;
use tourbook_shared::types::{InvoiceId, PageRequest, PageResponse, TransactionId};

use crate::{AppState, error::ApiResult, middleware::CurrentActor};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .patch(update_transaction)
                .put(edit_transaction),
        )
        .route("/invoices/{invoice_id}/transactions", get(list_transactions))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// `PAYMENT` or `REFUND`.
    pub transaction_type: TransactionKind,
    /// Invoice the money moves against.
    pub invoice_id: InvoiceId,
    /// Amount, as a number or decimal string.
    pub amount: Amount,
    /// Payment method label.
    pub payment_method: String,
    /// Payment date (YYYY-MM-DD).
    pub payment_date: Option<NaiveDate>,
    /// Evidence reference.
    pub evidence_url: Option<String>,
    /// Required for refunds.
    pub refund_reason: Option<String>,
    /// Confirm immediately.
    pub auto_confirm: Option<bool>,
}

/// Request body for editing a transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTransactionRequest {
    /// New amount.
    pub amount: Option<Amount>,
    /// New payment method.
    pub payment_method: Option<String>,
    /// New payment date.
    pub payment_date: Option<NaiveDate>,
    /// New evidence reference.
    pub evidence_url: Option<String>,
    /// Confirm a pending transaction now that evidence is attached.
    #[serde(default)]
    pub confirm_on_slip: bool,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction number, e.g. `TP2601-0001`.
    pub transaction_number: String,
    /// Payment or refund.
    pub transaction_type: TransactionKind,
    /// Invoice ID.
    pub invoice_id: Uuid,
    /// Quotation ID.
    pub quotation_id: Uuid,
    /// Amount.
    pub amount: Amount,
    /// Payment method.
    pub payment_method: String,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Evidence reference.
    pub evidence_url: Option<String>,
    /// Gateway charge id.
    pub gateway_reference: Option<String>,
    /// Refund reason.
    pub refund_reason: Option<String>,
    /// Status.
    pub status: TransactionStatus,
    /// Confirming user; absent for gateway confirmations.
    pub confirmed_by: Option<Uuid>,
    /// Confirmation time.
    pub confirmed_at: Option<String>,
    /// Cancellation time.
    pub cancelled_at: Option<String>,
    /// Cancellation reason.
    pub cancel_reason: Option<String>,
    /// Live receipt or credit note number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl TransactionResponse {
    fn new(t: customer_transactions::Model, document_number: Option<String>) -> Self {
        Self {
            id: t.id,
            transaction_number: t.transaction_number,
            transaction_type: t.transaction_kind.into(),
            invoice_id: t.invoice_id,
            quotation_id: t.quotation_id,
            amount: Amount::new(t.amount),
            payment_method: t.payment_method,
            payment_date: t.payment_date,
            evidence_url: t.evidence_url,
            gateway_reference: t.gateway_reference,
            refund_reason: t.refund_reason,
            status: t.status.into(),
            confirmed_by: t.confirmed_by,
            confirmed_at: t.confirmed_at.map(|at| at.to_rfc3339()),
            cancelled_at: t.cancelled_at.map(|at| at.to_rfc3339()),
            cancel_reason: t.cancel_reason,
            document_number,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/transactions` - Record a payment or refund.
async fn create_transaction(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repo = state.transactions();

    let outcome = repo
        .create(CreateTransactionInput {
            kind: payload.transaction_type,
            invoice_id: payload.invoice_id,
            amount: payload.amount,
            payment_method: payload.payment_method,
            payment_date: payload.payment_date,
            evidence_url: payload.evidence_url,
            refund_reason: payload.refund_reason,
            auto_confirm: payload.auto_confirm,
            actor: actor.actor(),
        })
        .await?;

    let status: TransactionStatus = outcome.transaction.status.into();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": outcome.transaction.id,
            "transactionNumber": outcome.transaction.transaction_number,
            "status": status,
            "documentNumber": outcome.document_number,
        })),
    ))
}

/// GET `/transactions/{transaction_id}` - Get a transaction.
async fn get_transaction(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(transaction_id): Path<TransactionId>,
) -> ApiResult<Json<TransactionResponse>> {
    let repo = state.transactions();
    let transaction = repo.find(transaction_id).await?;
    let document_number = repo.issued_document_number(&transaction).await?;
    Ok(Json(TransactionResponse::new(transaction, document_number)))
}

/// PATCH `/transactions/{transaction_id}` - Confirm or cancel.
async fn update_transaction(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(transaction_id): Path<TransactionId>,
    Json(action): Json<UpdateAction>,
) -> ApiResult<Json<Value>> {
    let repo = state.transactions();

    let outcome = match action {
        UpdateAction::Confirm => {
            repo.confirm(transaction_id, actor.actor(), GatewayConfirmation::default())
                .await?
        }
        UpdateAction::Cancel { reason } => {
            repo.cancel(transaction_id, actor.actor(), reason).await?
        }
    };

    Ok(Json(json!({
        "success": true,
        "documentNumber": outcome.document_number,
    })))
}

/// PUT `/transactions/{transaction_id}` - Edit amount and details.
async fn edit_transaction(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(transaction_id): Path<TransactionId>,
    Json(payload): Json<EditTransactionRequest>,
) -> ApiResult<Json<Value>> {
    let repo = state.transactions();

    let outcome = repo
        .edit(
            transaction_id,
            EditTransactionInput {
                amount: payload.amount,
                payment_method: payload.payment_method,
                payment_date: payload.payment_date,
                evidence_url: payload.evidence_url,
                confirm_on_slip: payload.confirm_on_slip,
            },
            actor.actor(),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "documentNumber": outcome.document_number,
    })))
}

/// GET `/invoices/{invoice_id}/transactions` - List an invoice's transactions.
async fn list_transactions(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(invoice_id): Path<InvoiceId>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<TransactionResponse>>> {
    let repo = state.transactions();
    let page = repo.list_for_invoice(invoice_id, &page).await?;

    Ok(Json(PageResponse {
        data: page
            .data
            .into_iter()
            .map(|t| TransactionResponse::new(t, None))
            .collect(),
        meta: page.meta,
    }))
}
