//! Invoice repository.
//!
//! Owns the invoice aggregates on the persistence side. `lock` and `apply`
//! are the only way engine operations touch `paid_amount`,
//! `refunded_amount` and `status`; both run on the caller's database
//! transaction.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

use tourbook_core::ledger::{InvoiceBalance, InvoiceLedger, LedgerDelta};
use tourbook_core::numbering::DocumentType;
use tourbook_core::transaction::{TransactionError, TransactionService};
use tourbook_shared::Amount;
use tourbook_shared::types::{InvoiceId, QuotationId};

use crate::entities::{invoices, quotations, sea_orm_active_enums::InvoiceStatus};

use super::clock::BusinessClock;
use super::error::EngineError;
use super::sequence::SequenceRepository;

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Quotation the invoice bills.
    pub quotation_id: QuotationId,
    /// Grand total, fixed at issuance.
    pub grand_total: Amount,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    clock: BusinessClock,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: BusinessClock::default(),
        }
    }

    /// Dates invoices and tax invoices on `clock`.
    #[must_use]
    pub fn with_clock(self, clock: BusinessClock) -> Self {
        Self { clock, ..self }
    }

    /// Issues a new invoice with an `IVN` number.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The grand total is not positive
    /// - The quotation does not exist
    /// - Database operation fails
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<invoices::Model, EngineError> {
        TransactionService::validate_amount(input.grand_total)?;

        let txn = self.db.begin().await?;

        quotations::Entity::find_by_id(input.quotation_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(TransactionError::QuotationNotFound(input.quotation_id))?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let period = self.clock.current_period();
        let id = InvoiceId::new();

        let (invoice, number) = SequenceRepository::insert_with_number(
            &txn,
            DocumentType::Invoice,
            period,
            |number: String| {
                invoices::ActiveModel {
                    id: Set(id.into_inner()),
                    quotation_id: Set(input.quotation_id.into_inner()),
                    invoice_number: Set(number),
                    grand_total: Set(input.grand_total.value()),
                    paid_amount: Set(Amount::ZERO.value()),
                    refunded_amount: Set(Amount::ZERO.value()),
                    status: Set(InvoiceStatus::Issued),
                    has_tax_invoice: Set(false),
                    tax_invoice_number: Set(None),
                    tax_invoice_issued_at: Set(None),
                    tax_invoice_cancelled_at: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            invoice_id = %id,
            invoice_number = %number,
            grand_total = %input.grand_total,
            "Invoice issued"
        );
        Ok(invoice)
    }

    /// Finds an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if absent.
    pub async fn find(&self, id: InvoiceId) -> Result<invoices::Model, EngineError> {
        let invoice = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(TransactionError::InvoiceNotFound(id))?;
        Ok(invoice)
    }

    /// Reads an invoice with `SELECT ... FOR UPDATE`.
    ///
    /// The lock is held until `txn` ends, so concurrent operations on the
    /// same invoice serialize here while other invoices are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if absent.
    pub async fn lock(
        txn: &DatabaseTransaction,
        id: InvoiceId,
    ) -> Result<invoices::Model, EngineError> {
        let invoice = invoices::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(TransactionError::InvoiceNotFound(id))?;
        Ok(invoice)
    }

    /// Current balance of a loaded invoice.
    #[must_use]
    pub fn balance(invoice: &invoices::Model) -> InvoiceBalance {
        InvoiceBalance {
            grand_total: Amount::new(invoice.grand_total),
            paid_amount: Amount::new(invoice.paid_amount),
            refunded_amount: Amount::new(invoice.refunded_amount),
            status: invoice.status.into(),
        }
    }

    /// Applies a ledger delta to a locked invoice and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the ledger error if the delta would break the balance
    /// invariant, or a database error.
    pub async fn apply(
        txn: &DatabaseTransaction,
        invoice: invoices::Model,
        delta: LedgerDelta,
    ) -> Result<invoices::Model, EngineError> {
        let next = InvoiceLedger::apply(&Self::balance(&invoice), delta)?;
        let invoice_id = invoice.id;

        let mut active: invoices::ActiveModel = invoice.into();
        active.paid_amount = Set(next.paid_amount.value());
        active.refunded_amount = Set(next.refunded_amount.value());
        active.status = Set(next.status.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(txn).await?;

        info!(
            invoice_id = %invoice_id,
            paid_amount = %next.paid_amount,
            refunded_amount = %next.refunded_amount,
            status = %next.status,
            "Invoice ledger updated"
        );
        Ok(updated)
    }

    /// Issues the tax invoice of an invoice with an `RVN` number.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice does not exist or is voided
    /// - A tax invoice is already active
    /// - Database operation fails
    pub async fn issue_tax_invoice(&self, id: InvoiceId) -> Result<invoices::Model, EngineError> {
        let txn = self.db.begin().await?;
        let invoice = Self::lock(&txn, id).await?;

        let status = tourbook_core::ledger::InvoiceStatus::from(invoice.status);
        if status == tourbook_core::ledger::InvoiceStatus::Voided {
            return Err(TransactionError::InvoiceClosed(status).into());
        }
        if invoice.has_tax_invoice {
            return Err(EngineError::TaxInvoiceAlreadyIssued(id));
        }

        let number = SequenceRepository::allocate(
            &txn,
            DocumentType::TaxInvoice,
            self.clock.current_period(),
        )
        .await?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut active: invoices::ActiveModel = invoice.into();
        active.has_tax_invoice = Set(true);
        active.tax_invoice_number = Set(Some(number.to_string()));
        active.tax_invoice_issued_at = Set(Some(now));
        active.tax_invoice_cancelled_at = Set(None);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(invoice_id = %id, tax_invoice_number = %number, "Tax invoice issued");
        Ok(updated)
    }

    /// Cancels the active tax invoice. The number and issue time are kept.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveTaxInvoice` if there is nothing to cancel.
    pub async fn cancel_tax_invoice(&self, id: InvoiceId) -> Result<invoices::Model, EngineError> {
        let txn = self.db.begin().await?;
        let invoice = Self::lock(&txn, id).await?;

        if !invoice.has_tax_invoice {
            return Err(EngineError::NoActiveTaxInvoice(id));
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut active: invoices::ActiveModel = invoice.into();
        active.has_tax_invoice = Set(false);
        active.tax_invoice_cancelled_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(invoice_id = %id, "Tax invoice cancelled");
        Ok(updated)
    }
}
