//! Wholesale transaction repository.
//!
//! Wholesale payments and refunds follow the same state machine as
//! customer transactions but are recorded against a quotation. They carry
//! no invoice ledger and issue no documents.

use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use tourbook_core::numbering::Period;
use tourbook_core::transaction::{
    Actor, Party, TransactionError, TransactionKind, TransactionService,
    TransactionStatus as CoreStatus, TransitionAction,
};
use tourbook_shared::Amount;
use tourbook_shared::types::{QuotationId, TransactionId};

use crate::entities::{quotations, sea_orm_active_enums::TransactionStatus, wholesale_transactions};

use super::clock::BusinessClock;
use super::error::EngineError;
use super::sequence::SequenceRepository;

/// Input for creating a wholesale transaction.
#[derive(Debug, Clone)]
pub struct CreateWholesaleInput {
    /// Payment to or refund from the wholesaler.
    pub kind: TransactionKind,
    /// Quotation the booking belongs to.
    pub quotation_id: QuotationId,
    /// Wholesaler name.
    pub wholesaler_name: String,
    /// Amount, rounded to two places.
    pub amount: Amount,
    /// Payment method label.
    pub payment_method: String,
    /// Payment date; defaults to today.
    pub payment_date: Option<NaiveDate>,
    /// Evidence reference.
    pub evidence_url: Option<String>,
    /// Required for refunds.
    pub refund_reason: Option<String>,
    /// Confirm immediately. Defaults to "evidence supplied".
    pub auto_confirm: Option<bool>,
    /// Who is creating the transaction.
    pub actor: Actor,
}

/// Input for editing a wholesale transaction.
#[derive(Debug, Clone, Default)]
pub struct EditWholesaleInput {
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

/// Wholesale transaction repository.
#[derive(Debug, Clone)]
pub struct WholesaleTransactionRepository {
    db: DatabaseConnection,
    clock: BusinessClock,
}

impl WholesaleTransactionRepository {
    /// Creates a new wholesale transaction repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: BusinessClock::default(),
        }
    }

    /// Dates transactions on `clock`.
    #[must_use]
    pub fn with_clock(self, clock: BusinessClock) -> Self {
        Self { clock, ..self }
    }

    /// Records a wholesale payment or refund.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The quotation does not exist
    /// - The amount or refund reason is invalid
    /// - Number allocation or the database fails
    pub async fn create(
        &self,
        input: CreateWholesaleInput,
    ) -> Result<wholesale_transactions::Model, EngineError> {
        let refund_reason = TransactionService::validate_wholesale_create(
            input.kind,
            input.amount,
            input.refund_reason.as_deref(),
        )?;

        let txn = self.db.begin().await?;

        quotations::Entity::find_by_id(input.quotation_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(TransactionError::QuotationNotFound(input.quotation_id))?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let today = self.clock.today();
        let id = TransactionId::new();
        let evidence_url = input.evidence_url.clone().filter(|u| !u.trim().is_empty());
        let confirm =
            TransactionService::should_auto_confirm(input.auto_confirm, evidence_url.as_deref());
        let actor_id = input.actor.user_id().map(|u| u.into_inner());

        let (transaction, number) = SequenceRepository::insert_with_number(
            &txn,
            input.kind.number_type(Party::Wholesale),
            Period::from_date(today),
            |number: String| {
                wholesale_transactions::ActiveModel {
                    id: Set(id.into_inner()),
                    transaction_number: Set(number),
                    transaction_kind: Set(input.kind.into()),
                    quotation_id: Set(input.quotation_id.into_inner()),
                    wholesaler_name: Set(input.wholesaler_name.trim().to_string()),
                    amount: Set(input.amount.value()),
                    payment_method: Set(input.payment_method.clone()),
                    payment_date: Set(input.payment_date.unwrap_or(today)),
                    evidence_url: Set(evidence_url.clone()),
                    refund_reason: Set(refund_reason.clone()),
                    status: Set(if confirm {
                        TransactionStatus::Confirmed
                    } else {
                        TransactionStatus::Pending
                    }),
                    confirmed_by: Set(actor_id.filter(|_| confirm)),
                    confirmed_at: Set(confirm.then_some(now)),
                    cancelled_by: Set(None),
                    cancelled_at: Set(None),
                    cancel_reason: Set(None),
                    created_by: Set(actor_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = %id,
            quotation_id = %input.quotation_id,
            transaction_number = %number,
            kind = %input.kind,
            confirmed = confirm,
            "Wholesale transaction created"
        );
        Ok(transaction)
    }

    /// Confirms a pending wholesale transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the transaction is pending.
    pub async fn confirm(
        &self,
        id: TransactionId,
        actor: Actor,
    ) -> Result<wholesale_transactions::Model, EngineError> {
        let txn = self.db.begin().await?;
        let transaction = Self::lock(&txn, id).await?;

        let current = CoreStatus::from(transaction.status);
        let TransitionAction::Confirm {
            confirmed_by,
            confirmed_at,
            ..
        } = TransactionService::confirm(current, actor)?
        else {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Confirmed,
            }
            .into());
        };

        let confirmed_at: DateTimeWithTimeZone = confirmed_at.into();
        let mut active: wholesale_transactions::ActiveModel = transaction.into();
        active.status = Set(TransactionStatus::Confirmed);
        active.confirmed_by = Set(confirmed_by.user_id().map(|u| u.into_inner()));
        active.confirmed_at = Set(Some(confirmed_at));
        active.updated_at = Set(confirmed_at);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(transaction_id = %id, actor = %actor, "Wholesale transaction confirmed");
        Ok(updated)
    }

    /// Cancels a pending or confirmed wholesale transaction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if already cancelled.
    pub async fn cancel(
        &self,
        id: TransactionId,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<wholesale_transactions::Model, EngineError> {
        let txn = self.db.begin().await?;
        let transaction = Self::lock(&txn, id).await?;

        let current = CoreStatus::from(transaction.status);
        let TransitionAction::Cancel {
            cancelled_by,
            cancelled_at,
            reason,
            ..
        } = TransactionService::cancel(current, actor, reason)?
        else {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Cancelled,
            }
            .into());
        };

        let cancelled_at: DateTimeWithTimeZone = cancelled_at.into();
        let mut active: wholesale_transactions::ActiveModel = transaction.into();
        active.status = Set(TransactionStatus::Cancelled);
        active.cancelled_by = Set(cancelled_by.user_id().map(|u| u.into_inner()));
        active.cancelled_at = Set(Some(cancelled_at));
        active.cancel_reason = Set(reason);
        active.updated_at = Set(cancelled_at);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(transaction_id = %id, actor = %actor, "Wholesale transaction cancelled");
        Ok(updated)
    }

    /// Edits a pending or confirmed wholesale transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` once cancelled, or `InvalidAmount`.
    pub async fn edit(
        &self,
        id: TransactionId,
        input: EditWholesaleInput,
    ) -> Result<wholesale_transactions::Model, EngineError> {
        let txn = self.db.begin().await?;
        let transaction = Self::lock(&txn, id).await?;

        let old_amount = Amount::new(transaction.amount);
        let new_amount = input.amount.unwrap_or(old_amount);
        TransactionService::plan_edit(transaction.status.into(), old_amount, new_amount)?;

        let mut active: wholesale_transactions::ActiveModel = transaction.into();
        active.amount = Set(new_amount.value());
        if let Some(name) = input.wholesaler_name.filter(|n| !n.trim().is_empty()) {
            active.wholesaler_name = Set(name.trim().to_string());
        }
        if let Some(method) = input.payment_method {
            active.payment_method = Set(method);
        }
        if let Some(date) = input.payment_date {
            active.payment_date = Set(date);
        }
        if let Some(url) = input.evidence_url.filter(|u| !u.trim().is_empty()) {
            active.evidence_url = Set(Some(url));
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(transaction_id = %id, amount = %new_amount, "Wholesale transaction edited");
        Ok(updated)
    }

    /// Finds a wholesale transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if absent.
    pub async fn find(
        &self,
        id: TransactionId,
    ) -> Result<wholesale_transactions::Model, EngineError> {
        let transaction = wholesale_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;
        Ok(transaction)
    }

    /// Lists the wholesale transactions of a quotation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_quotation(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Vec<wholesale_transactions::Model>, EngineError> {
        let rows = wholesale_transactions::Entity::find()
            .filter(wholesale_transactions::Column::QuotationId.eq(quotation_id.into_inner()))
            .order_by_asc(wholesale_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn lock(
        txn: &DatabaseTransaction,
        id: TransactionId,
    ) -> Result<wholesale_transactions::Model, EngineError> {
        let transaction = wholesale_transactions::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;
        Ok(transaction)
    }
}
