//! Customer transaction repository.
//!
//! Every public operation is one database transaction. Locks are always
//! taken in the same order: invoice row, then transaction row, then the
//! sequence counter inside number allocation.

use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use tourbook_core::numbering::Period;
use tourbook_core::transaction::{
    Actor, EditPlan, Party, TransactionError, TransactionKind, TransactionService,
    TransactionStatus as CoreStatus, TransitionAction,
};
use tourbook_shared::Amount;
use tourbook_shared::types::{InvoiceId, PageRequest, PageResponse, TransactionId};

use crate::entities::{customer_transactions, invoices, sea_orm_active_enums::TransactionStatus};

use super::clock::BusinessClock;
use super::document;
use super::error::EngineError;
use super::invoice::InvoiceRepository;
use super::sequence::SequenceRepository;

/// Input for creating a customer transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Payment or refund.
    pub kind: TransactionKind,
    /// Invoice the money moves against.
    pub invoice_id: InvoiceId,
    /// Amount, rounded to two places.
    pub amount: Amount,
    /// Payment method label, e.g. `bank_transfer`.
    pub payment_method: String,
    /// Payment date; defaults to today.
    pub payment_date: Option<NaiveDate>,
    /// Uploaded slip or other evidence.
    pub evidence_url: Option<String>,
    /// Required for refunds.
    pub refund_reason: Option<String>,
    /// Confirm in the same unit of work. Defaults to "evidence supplied".
    pub auto_confirm: Option<bool>,
    /// Who is creating the transaction.
    pub actor: Actor,
}

/// Input for editing a customer transaction.
#[derive(Debug, Clone, Default)]
pub struct EditTransactionInput {
    /// New amount.
    pub amount: Option<Amount>,
    /// New payment method.
    pub payment_method: Option<String>,
    /// New payment date.
    pub payment_date: Option<NaiveDate>,
    /// New evidence reference.
    pub evidence_url: Option<String>,
    /// Confirm a pending transaction now that evidence is present.
    pub confirm_on_slip: bool,
}

/// Result of a gateway-driven confirmation.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfirmation {
    /// Gateway charge id.
    pub reference: Option<String>,
    /// Payment date reported by the gateway.
    pub paid_on: Option<NaiveDate>,
}

/// A transaction together with the document its last step issued.
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    /// Transaction after the operation.
    pub transaction: customer_transactions::Model,
    /// Number of the receipt or credit note issued by this operation.
    pub document_number: Option<String>,
}

/// Customer transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    clock: BusinessClock,
}

impl TransactionRepository {
    /// Creates a new transaction repository on the default business clock.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: BusinessClock::default(),
        }
    }

    /// Dates documents and payments on `clock`.
    #[must_use]
    pub fn with_clock(self, clock: BusinessClock) -> Self {
        Self { clock, ..self }
    }

    /// Records a payment or refund against an invoice.
    ///
    /// When immediate confirmation applies, the confirm effects run in the
    /// same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice does not exist or is closed
    /// - The amount or refund reason is invalid
    /// - Number allocation or the database fails
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<TransactionOutcome, EngineError> {
        let txn = self.db.begin().await?;

        let invoice = InvoiceRepository::lock(&txn, input.invoice_id).await?;
        let balance = InvoiceRepository::balance(&invoice);
        let refund_reason = TransactionService::validate_create(
            input.kind,
            input.amount,
            &balance,
            input.refund_reason.as_deref(),
        )?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let today = self.clock.today();
        let id = TransactionId::new();
        let evidence_url = input.evidence_url.clone().filter(|u| !u.trim().is_empty());

        let (transaction, number) = SequenceRepository::insert_with_number(
            &txn,
            input.kind.number_type(Party::Customer),
            Period::from_date(today),
            |number: String| {
                customer_transactions::ActiveModel {
                    id: Set(id.into_inner()),
                    transaction_number: Set(number),
                    transaction_kind: Set(input.kind.into()),
                    invoice_id: Set(invoice.id),
                    quotation_id: Set(invoice.quotation_id),
                    amount: Set(input.amount.value()),
                    payment_method: Set(input.payment_method.clone()),
                    payment_date: Set(input.payment_date.unwrap_or(today)),
                    evidence_url: Set(evidence_url.clone()),
                    gateway_reference: Set(None),
                    refund_reason: Set(refund_reason.clone()),
                    status: Set(TransactionStatus::Pending),
                    confirmed_by: Set(None),
                    confirmed_at: Set(None),
                    cancelled_by: Set(None),
                    cancelled_at: Set(None),
                    cancel_reason: Set(None),
                    created_by: Set(input.actor.user_id().map(|u| u.into_inner())),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
            },
        )
        .await?;

        info!(
            transaction_id = %id,
            invoice_id = %input.invoice_id,
            transaction_number = %number,
            kind = %input.kind,
            amount = %input.amount,
            "Transaction created"
        );

        let outcome =
            if TransactionService::should_auto_confirm(input.auto_confirm, evidence_url.as_deref())
            {
                self.apply_confirm(
                    &txn,
                    invoice,
                    transaction,
                    input.actor,
                    GatewayConfirmation::default(),
                )
                .await?
            } else {
                TransactionOutcome {
                    transaction,
                    document_number: None,
                }
            };

        txn.commit().await?;
        Ok(outcome)
    }

    /// Confirms a pending transaction.
    ///
    /// Issues the receipt or credit note and applies the amount to the
    /// invoice ledger atomically.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the transaction is pending.
    pub async fn confirm(
        &self,
        id: TransactionId,
        actor: Actor,
        gateway: GatewayConfirmation,
    ) -> Result<TransactionOutcome, EngineError> {
        let txn = self.db.begin().await?;
        let (invoice, transaction) = Self::lock_pair(&txn, id).await?;
        let outcome = self.apply_confirm(&txn, invoice, transaction, actor, gateway).await?;
        txn.commit().await?;
        Ok(outcome)
    }

    /// Cancels a pending or confirmed transaction.
    ///
    /// Cancelling a confirmed transaction reverses its ledger adjustment
    /// and cancels its document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if already cancelled.
    pub async fn cancel(
        &self,
        id: TransactionId,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<TransactionOutcome, EngineError> {
        self.cancel_guarded(id, actor, reason, &[CoreStatus::Pending, CoreStatus::Confirmed])
            .await
    }

    /// Cancels a transaction only while it is still pending.
    ///
    /// Used for gateway failures and expiries, which must never undo a
    /// payment that already completed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the transaction is pending.
    pub async fn cancel_pending(
        &self,
        id: TransactionId,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<TransactionOutcome, EngineError> {
        self.cancel_guarded(id, actor, reason, &[CoreStatus::Pending])
            .await
    }

    async fn cancel_guarded(
        &self,
        id: TransactionId,
        actor: Actor,
        reason: Option<String>,
        allowed_from: &[CoreStatus],
    ) -> Result<TransactionOutcome, EngineError> {
        let txn = self.db.begin().await?;
        let (invoice, transaction) = Self::lock_pair(&txn, id).await?;

        let current = CoreStatus::from(transaction.status);
        if !allowed_from.contains(&current) {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Cancelled,
            }
            .into());
        }

        let action = TransactionService::cancel(current, actor, reason)?;
        let TransitionAction::Cancel {
            cancelled_by,
            cancelled_at,
            reason,
            reverse_effects,
            ..
        } = action
        else {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Cancelled,
            }
            .into());
        };

        let cancelled_at: DateTimeWithTimeZone = cancelled_at.into();
        let result = customer_transactions::Entity::update_many()
            .set(customer_transactions::ActiveModel {
                status: Set(TransactionStatus::Cancelled),
                cancelled_by: Set(cancelled_by.user_id().map(|u| u.into_inner())),
                cancelled_at: Set(Some(cancelled_at)),
                cancel_reason: Set(reason.clone()),
                updated_at: Set(cancelled_at),
                ..Default::default()
            })
            .filter(customer_transactions::Column::Id.eq(transaction.id))
            .filter(customer_transactions::Column::Status.eq(transaction.status))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Cancelled,
            }
            .into());
        }

        let kind = TransactionKind::from(transaction.transaction_kind);
        if reverse_effects {
            let delta = kind.ledger_delta(Amount::new(transaction.amount)).inverse();
            InvoiceRepository::apply(&txn, invoice, delta).await?;
            let cancelled = document::cancel_issued(&txn, kind, transaction.id).await?;
            if cancelled == 0 {
                warn!(transaction_id = %id, "Confirmed transaction had no issued document");
            }
        }

        let mut updated = transaction;
        updated.status = TransactionStatus::Cancelled;
        updated.cancelled_by = cancelled_by.user_id().map(|u| u.into_inner());
        updated.cancelled_at = Some(cancelled_at);
        updated.cancel_reason = reason;
        updated.updated_at = cancelled_at;

        txn.commit().await?;

        info!(
            transaction_id = %id,
            invoice_id = %updated.invoice_id,
            reversed = reverse_effects,
            actor = %actor,
            "Transaction cancelled"
        );
        Ok(TransactionOutcome {
            transaction: updated,
            document_number: None,
        })
    }

    /// Edits a transaction.
    ///
    /// Pending transactions are re-validated against the invoice. Confirmed
    /// transactions re-apply the amount difference to the ledger and to the
    /// issued document. Cancelled transactions are rejected.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` for cancelled transactions, validation errors
    /// for amounts that no longer fit, or `EvidenceRequired` when asked to
    /// confirm without evidence.
    pub async fn edit(
        &self,
        id: TransactionId,
        input: EditTransactionInput,
        actor: Actor,
    ) -> Result<TransactionOutcome, EngineError> {
        let txn = self.db.begin().await?;
        let (invoice, transaction) = Self::lock_pair(&txn, id).await?;

        let current = CoreStatus::from(transaction.status);
        let kind = TransactionKind::from(transaction.transaction_kind);
        let old_amount = Amount::new(transaction.amount);
        let new_amount = input.amount.unwrap_or(old_amount);

        let plan = TransactionService::plan_edit(current, old_amount, new_amount)?;
        let invoice = match plan {
            EditPlan::Replace => {
                TransactionService::validate_create(
                    kind,
                    new_amount,
                    &InvoiceRepository::balance(&invoice),
                    transaction.refund_reason.as_deref(),
                )?;
                invoice
            }
            EditPlan::Rebalance { delta } if delta.is_zero() => invoice,
            EditPlan::Rebalance { delta } => {
                let invoice =
                    InvoiceRepository::apply(&txn, invoice, kind.ledger_delta(delta)).await?;
                document::set_amount(&txn, kind, transaction.id, new_amount.value()).await?;
                info!(
                    transaction_id = %id,
                    delta = %delta,
                    "Confirmed transaction amount rebalanced"
                );
                invoice
            }
        };

        let mut active: customer_transactions::ActiveModel = transaction.into();
        active.amount = Set(new_amount.value());
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

        let outcome = if input.confirm_on_slip && current == CoreStatus::Pending {
            if updated.evidence_url.is_none() {
                return Err(TransactionError::EvidenceRequired.into());
            }
            self.apply_confirm(&txn, invoice, updated, actor, GatewayConfirmation::default())
                .await?
        } else {
            TransactionOutcome {
                transaction: updated,
                document_number: None,
            }
        };

        txn.commit().await?;

        info!(transaction_id = %id, amount = %new_amount, "Transaction edited");
        Ok(outcome)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if absent.
    pub async fn find(
        &self,
        id: TransactionId,
    ) -> Result<customer_transactions::Model, EngineError> {
        let transaction = customer_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;
        Ok(transaction)
    }

    /// Number of the live receipt or credit note of a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn issued_document_number(
        &self,
        transaction: &customer_transactions::Model,
    ) -> Result<Option<String>, EngineError> {
        let doc = document::find_issued(
            &self.db,
            transaction.transaction_kind.into(),
            transaction.id,
        )
        .await?;
        Ok(doc.map(|d| d.document_number))
    }

    /// Lists the transactions of an invoice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice is absent.
    pub async fn list_for_invoice(
        &self,
        invoice_id: InvoiceId,
        page: &PageRequest,
    ) -> Result<PageResponse<customer_transactions::Model>, EngineError> {
        invoices::Entity::find_by_id(invoice_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(TransactionError::InvoiceNotFound(invoice_id))?;

        let page = page.normalized();
        let query = customer_transactions::Entity::find()
            .filter(customer_transactions::Column::InvoiceId.eq(invoice_id.into_inner()));

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_asc(customer_transactions::Column::CreatedAt)
            .order_by_asc(customer_transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }

    /// Locks the invoice and then the transaction row.
    async fn lock_pair(
        txn: &DatabaseTransaction,
        id: TransactionId,
    ) -> Result<(invoices::Model, customer_transactions::Model), EngineError> {
        let invoice_id = customer_transactions::Entity::find_by_id(id.into_inner())
            .one(txn)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?
            .invoice_id;

        let invoice = InvoiceRepository::lock(txn, InvoiceId::from_uuid(invoice_id)).await?;
        let transaction = customer_transactions::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(TransactionError::TransactionNotFound(id))?;

        Ok((invoice, transaction))
    }

    /// Confirm effects: guarded status update, document issuance and ledger
    /// update, all on `txn`.
    async fn apply_confirm(
        &self,
        txn: &DatabaseTransaction,
        invoice: invoices::Model,
        transaction: customer_transactions::Model,
        actor: Actor,
        gateway: GatewayConfirmation,
    ) -> Result<TransactionOutcome, EngineError> {
        let current = CoreStatus::from(transaction.status);
        let action = TransactionService::confirm(current, actor)?;
        let TransitionAction::Confirm {
            confirmed_by,
            confirmed_at,
            ..
        } = action
        else {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Confirmed,
            }
            .into());
        };

        let invoice_status = InvoiceRepository::balance(&invoice).status;
        if invoice_status.is_closed() {
            return Err(TransactionError::InvoiceClosed(invoice_status).into());
        }

        let period = self.clock.period_of(confirmed_at);
        let confirmed_at: DateTimeWithTimeZone = confirmed_at.into();
        let payment_date = gateway.paid_on.unwrap_or(transaction.payment_date);
        let gateway_reference = gateway.reference.or(transaction.gateway_reference.clone());

        let result = customer_transactions::Entity::update_many()
            .set(customer_transactions::ActiveModel {
                status: Set(TransactionStatus::Confirmed),
                confirmed_by: Set(confirmed_by.user_id().map(|u| u.into_inner())),
                confirmed_at: Set(Some(confirmed_at)),
                gateway_reference: Set(gateway_reference.clone()),
                payment_date: Set(payment_date),
                updated_at: Set(confirmed_at),
                ..Default::default()
            })
            .filter(customer_transactions::Column::Id.eq(transaction.id))
            .filter(customer_transactions::Column::Status.eq(TransactionStatus::Pending))
            .exec(txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(TransactionError::InvalidTransition {
                from: current,
                to: CoreStatus::Confirmed,
            }
            .into());
        }

        let kind = TransactionKind::from(transaction.transaction_kind);
        let invoice_id = invoice.id;
        InvoiceRepository::apply(txn, invoice, kind.ledger_delta(Amount::new(transaction.amount)))
            .await?;

        let number = document::issue(txn, &transaction, period).await?;

        let mut updated = transaction;
        updated.status = TransactionStatus::Confirmed;
        updated.confirmed_by = confirmed_by.user_id().map(|u| u.into_inner());
        updated.confirmed_at = Some(confirmed_at);
        updated.gateway_reference = gateway_reference;
        updated.payment_date = payment_date;
        updated.updated_at = confirmed_at;

        info!(
            transaction_id = %updated.id,
            invoice_id = %invoice_id,
            document_number = %number,
            actor = %actor,
            "Transaction confirmed"
        );
        Ok(TransactionOutcome {
            transaction: updated,
            document_number: Some(number.to_string()),
        })
    }
}
