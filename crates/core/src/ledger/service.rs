//! Invoice ledger service.
//!
//! `InvoiceLedger::apply` is the only function that produces new invoice
//! aggregates. Callers are expected to hold a lock on the invoice row while
//! they compute and persist its result.

use crate::ledger::error::LedgerError;
use crate::ledger::types::{EntryKind, InvoiceBalance, InvoiceStatus, LedgerDelta};

/// Stateless invoice ledger.
pub struct InvoiceLedger;

impl InvoiceLedger {
    /// Applies a signed delta to an invoice balance.
    ///
    /// The result always satisfies `0 <= paid - refunded <= grand_total`;
    /// mutations that would break this are rejected without side effects.
    pub fn apply(
        balance: &InvoiceBalance,
        delta: LedgerDelta,
    ) -> Result<InvoiceBalance, LedgerError> {
        if balance.status == InvoiceStatus::Voided {
            return Err(LedgerError::InvoiceVoided);
        }

        let mut next = *balance;
        match delta.kind {
            EntryKind::Payment => next.paid_amount = next.paid_amount + delta.amount,
            EntryKind::Refund => next.refunded_amount = next.refunded_amount + delta.amount,
        }

        if next.paid_amount.is_negative() || next.refunded_amount.is_negative() {
            return Err(LedgerError::NegativeAggregate);
        }

        let net_paid = next.net_paid();
        if net_paid > next.grand_total {
            return Err(LedgerError::ExceedsGrandTotal {
                net_paid,
                grand_total: next.grand_total,
            });
        }
        if net_paid.is_negative() {
            return Err(LedgerError::NegativeNetPaid { net_paid });
        }

        next.status = Self::derive_status(&next, delta.increases_refunds());
        Ok(next)
    }

    /// Derives the status implied by the aggregates.
    ///
    /// A net paid amount of zero means `Cancelled` when a refund got it
    /// there, and `Issued` when a payment was reversed.
    #[must_use]
    pub fn derive_status(balance: &InvoiceBalance, refund_driven: bool) -> InvoiceStatus {
        let net_paid = balance.net_paid();
        if net_paid.is_positive() && net_paid >= balance.grand_total {
            InvoiceStatus::Paid
        } else if net_paid.is_positive() {
            InvoiceStatus::PartialPaid
        } else if refund_driven {
            InvoiceStatus::Cancelled
        } else {
            InvoiceStatus::Issued
        }
    }
}
