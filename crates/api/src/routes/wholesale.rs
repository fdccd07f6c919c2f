//! Wholesale transaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tourbook_core::transaction::{TransactionKind, TransactionStatus, UpdateAction};
use tourbook_db::entities::wholesale_transactions;
use tourbook_db::repositories::{CreateWholesaleInput, EditWholesaleInput};
use tourbook_shared::Amount;
use tourbook_shared::types::{QuotationId, TransactionId};

use crate::{AppState, error::ApiResult, middleware::CurrentActor};

/// Creates the wholesale transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wholesale-transactions", post(create_wholesale))
        .route(
            "/wholesale-transactions/{transaction_id}",
            patch(update_wholesale).put(edit_wholesale),
        )
        .route(
            "/quotations/{quotation_id}/wholesale-transactions",
            get(list_wholesale),
        )
}

/// Request body for recording a wholesale payment or refund.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWholesaleRequest {
    /// `PAYMENT` or `REFUND`.
    pub transaction_type: TransactionKind,
    /// Quotation the booking belongs to.
    pub quotation_id: QuotationId,
    /// Wholesaler name.
    pub wholesaler_name: String,
    /// Amount.
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

/// Request body for editing a wholesale transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditWholesaleRequest {
    /// New amount.
    pub amount: Option<Amount>,
    /// New wholesaler name.
    pub wholesaler_name: Option<String>,
    /// New payment method.
    pub payment_method: Option<String>,
    /// New payment date.
    pub payment_date: Option<NaiveDate>,
    /// New evidence reference.
    pub evidence_url: Option<String>,
}

/// Response for a wholesale transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WholesaleResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction number, e.g. `WP2601-0001`.
    pub transaction_number: String,
    /// Payment or refund.
    pub transaction_type: TransactionKind,
    /// Quotation ID.
    pub quotation_id: Uuid,
    /// Wholesaler name.
    pub wholesaler_name: String,
    /// Amount.
    pub amount: Amount,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Status.
    pub status: TransactionStatus,
    /// Cancellation reason.
    pub cancel_reason: Option<String>,
}

impl From<wholesale_transactions::Model> for WholesaleResponse {
    fn from(t: wholesale_transactions::Model) -> Self {
        Self {
            id: t.id,
            transaction_number: t.transaction_number,
            transaction_type: t.transaction_kind.into(),
            quotation_id: t.quotation_id,
            wholesaler_name: t.wholesaler_name,
            amount: Amount::new(t.amount),
            payment_date: t.payment_date,
            status: t.status.into(),
            cancel_reason: t.cancel_reason,
        }
    }
}

/// POST `/wholesale-transactions` - Record a wholesale payment or refund.
async fn create_wholesale(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(payload): Json<CreateWholesaleRequest>,
) -> ApiResult<(StatusCode, Json<WholesaleResponse>)> {
    let transaction = state.wholesale()
        .create(CreateWholesaleInput {
            kind: payload.transaction_type,
            quotation_id: payload.quotation_id,
            wholesaler_name: payload.wholesaler_name,
            amount: payload.amount,
            payment_method: payload.payment_method,
            payment_date: payload.payment_date,
            evidence_url: payload.evidence_url,
            refund_reason: payload.refund_reason,
            auto_confirm: payload.auto_confirm,
            actor: actor.actor(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// PATCH `/wholesale-transactions/{transaction_id}` - Confirm or cancel.
async fn update_wholesale(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(transaction_id): Path<TransactionId>,
    Json(action): Json<UpdateAction>,
) -> ApiResult<Json<WholesaleResponse>> {
    let repo = state.wholesale();
    let transaction = match action {
        UpdateAction::Confirm => repo.confirm(transaction_id, actor.actor()).await?,
        UpdateAction::Cancel { reason } => {
            repo.cancel(transaction_id, actor.actor(), reason).await?
        }
    };
    Ok(Json(transaction.into()))
}

/// PUT `/wholesale-transactions/{transaction_id}` - Edit amount and details.
async fn edit_wholesale(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(transaction_id): Path<TransactionId>,
    Json(payload): Json<EditWholesaleRequest>,
) -> ApiResult<Json<WholesaleResponse>> {
    let transaction = state.wholesale()
        .edit(
            transaction_id,
            EditWholesaleInput {
                amount: payload.amount,
                wholesaler_name: payload.wholesaler_name,
                payment_method: payload.payment_method,
                payment_date: payload.payment_date,
                evidence_url: payload.evidence_url,
            },
        )
        .await?;
    Ok(Json(transaction.into()))
}

/// GET `/quotations/{quotation_id}/wholesale-transactions` - List a quotation's wholesale transactions.
async fn list_wholesale(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(quotation_id): Path<QuotationId>,
) -> ApiResult<Json<Vec<WholesaleResponse>>> {
    let transactions = state.wholesale()
        .list_for_quotation(quotation_id)
        .await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
