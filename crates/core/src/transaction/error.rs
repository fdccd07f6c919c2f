//! Transaction error types.

use thiserror::Error;
use tourbook_shared::types::{InvoiceId, QuotationId, TransactionId};
use tourbook_shared::{Amount, AppError};

use crate::ledger::{InvoiceStatus, LedgerError};
use crate::numbering::NumberingError;
use crate::transaction::types::TransactionStatus;

/// Errors that can occur during transaction operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Amount is zero or negative after rounding.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// Payment exceeds what is left to pay.
    #[error("Amount {amount} exceeds remaining balance {remaining}")]
    ExceedsRemaining {
        /// Requested amount.
        amount: Amount,
        /// Amount still payable.
        remaining: Amount,
    },

    /// Refund exceeds the net paid amount.
    #[error("Amount {amount} exceeds refundable amount {refundable}")]
    ExceedsRefundable {
        /// Requested amount.
        amount: Amount,
        /// Net paid amount available for refund.
        refundable: Amount,
    },

    /// Refunds require a reason.
    #[error("Refund reason is required")]
    RefundReasonRequired,

    /// Confirming on upload needs an evidence reference.
    #[error("Evidence is required to confirm on slip upload")]
    EvidenceRequired,

    /// Transition not valid from the current status.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: TransactionStatus,
        /// The attempted target status.
        to: TransactionStatus,
    },

    /// A cancelled transaction cannot be edited.
    #[error("Cannot edit a {0} transaction")]
    NotEditable(TransactionStatus),

    /// The invoice no longer accepts new transactions.
    #[error("Invoice is {0} and accepts no new transactions")]
    InvoiceClosed(InvoiceStatus),

    /// Invoice not found.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    /// Transaction not found.
    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),

    /// Quotation not found.
    #[error("Quotation {0} not found")]
    QuotationNotFound(QuotationId),

    /// Ledger rejected the mutation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Numbering failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),
}

impl TransactionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount
            | Self::ExceedsRemaining { .. }
            | Self::ExceedsRefundable { .. }
            | Self::RefundReasonRequired
            | Self::EvidenceRequired => 400,

            Self::InvoiceNotFound(_) | Self::TransactionNotFound(_) | Self::QuotationNotFound(_) => {
                404
            }

            Self::InvalidTransition { .. } | Self::NotEditable(_) | Self::InvoiceClosed(_) => 409,

            Self::Ledger(err) => err.status_code(),
            Self::Numbering(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
            Self::ExceedsRefundable { .. } => "EXCEEDS_REFUNDABLE",
            Self::RefundReasonRequired => "REFUND_REASON_REQUIRED",
            Self::EvidenceRequired => "EVIDENCE_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::InvoiceClosed(_) => "INVOICE_CLOSED",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::QuotationNotFound(_) => "QUOTATION_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
            Self::Numbering(err) => err.error_code(),
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Ledger(inner) => inner.into(),
            TransactionError::Numbering(inner) => inner.into(),
            other => {
                let message = other.to_string();
                match other.status_code() {
                    404 => Self::NotFound(message),
                    409 => Self::Conflict(message),
                    _ => Self::Validation(message),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = TransactionError::InvalidTransition {
            from: TransactionStatus::Cancelled,
            to: TransactionStatus::Confirmed,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("CANCELLED"));
        assert!(err.to_string().contains("CONFIRMED"));
    }

    #[test]
    fn test_exceeds_remaining_carries_amounts() {
        let err = TransactionError::ExceedsRemaining {
            amount: Amount::from_minor(1),
            remaining: Amount::ZERO,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Amount 0.01 exceeds remaining balance 0.00"
        );
    }

    #[test]
    fn test_not_found_errors() {
        let err = TransactionError::TransactionNotFound(TransactionId::new());
        assert_eq!(err.status_code(), 404);
        assert!(matches!(AppError::from(err), AppError::NotFound(_)));
    }

    #[test]
    fn test_nested_errors_delegate() {
        let err = TransactionError::from(NumberingError::AllocationConflict {
            doc_type: crate::numbering::DocumentType::Receipt,
        });
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.error_code(), "ALLOCATION_CONFLICT");
        assert!(matches!(AppError::from(err), AppError::Unavailable(_)));
    }

    #[test]
    fn test_invoice_closed_is_conflict() {
        let err = TransactionError::InvoiceClosed(InvoiceStatus::Voided);
        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    }
}
