//! Ledger error types.

use thiserror::Error;
use tourbook_shared::{Amount, AppError};

/// Errors that can occur when mutating invoice aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The invoice has been voided and accepts no money movement.
    #[error("Invoice is voided")]
    InvoiceVoided,

    /// The mutation would push the net paid amount above the grand total.
    #[error("Net paid amount {net_paid} would exceed grand total {grand_total}")]
    ExceedsGrandTotal {
        /// Net paid amount after the mutation.
        net_paid: Amount,
        /// Invoice grand total.
        grand_total: Amount,
    },

    /// The mutation would leave refunds larger than payments.
    #[error("Net paid amount would become negative ({net_paid})")]
    NegativeNetPaid {
        /// Net paid amount after the mutation.
        net_paid: Amount,
    },

    /// An aggregate would become negative.
    #[error("Invoice aggregates cannot be negative")]
    NegativeAggregate,
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvoiceVoided => 409,
            Self::ExceedsGrandTotal { .. }
            | Self::NegativeNetPaid { .. }
            | Self::NegativeAggregate => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceVoided => "INVOICE_VOIDED",
            Self::ExceedsGrandTotal { .. } => "EXCEEDS_GRAND_TOTAL",
            Self::NegativeNetPaid { .. } => "NEGATIVE_NET_PAID",
            Self::NegativeAggregate => "NEGATIVE_AGGREGATE",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvoiceVoided => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
