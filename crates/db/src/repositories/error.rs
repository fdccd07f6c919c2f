//! Error type shared by the engine repositories.

use sea_orm::DbErr;
use thiserror::Error;
use tourbook_core::ledger::LedgerError;
use tourbook_core::numbering::NumberingError;
use tourbook_core::transaction::TransactionError;
use tourbook_shared::AppError;
use tourbook_shared::types::InvoiceId;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine rule violated.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The invoice already has an active tax invoice.
    #[error("Invoice {0} already has an active tax invoice")]
    TaxInvoiceAlreadyIssued(InvoiceId),

    /// The invoice has no active tax invoice to cancel.
    #[error("Invoice {0} has no active tax invoice")]
    NoActiveTaxInvoice(InvoiceId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        Self::Transaction(err.into())
    }
}

impl From<NumberingError> for EngineError {
    fn from(err: NumberingError) -> Self {
        Self::Transaction(err.into())
    }
}

impl EngineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Transaction(err) => err.status_code(),
            Self::TaxInvoiceAlreadyIssued(_) | Self::NoActiveTaxInvoice(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transaction(err) => err.error_code(),
            Self::TaxInvoiceAlreadyIssued(_) => "TAX_INVOICE_ALREADY_ISSUED",
            Self::NoActiveTaxInvoice(_) => "NO_ACTIVE_TAX_INVOICE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the engine error, if this is one.
    #[must_use]
    pub fn as_transaction_error(&self) -> Option<&TransactionError> {
        match self {
            Self::Transaction(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Transaction(inner) => inner.into(),
            EngineError::TaxInvoiceAlreadyIssued(_) | EngineError::NoActiveTaxInvoice(_) => {
                Self::Conflict(err.to_string())
            }
            EngineError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}
