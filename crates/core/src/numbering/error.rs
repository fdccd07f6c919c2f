//! Numbering error types.

use thiserror::Error;
use tourbook_shared::AppError;

use crate::numbering::types::DocumentType;

/// Errors that can occur while formatting, parsing or allocating numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    /// The string is not a document number.
    #[error("Invalid document number: {0}")]
    InvalidFormat(String),

    /// The prefix does not belong to any document type.
    #[error("Unknown document prefix: {0}")]
    UnknownPrefix(String),

    /// The month is outside 1..=12.
    #[error("Invalid period {year}-{month}")]
    InvalidPeriod {
        /// Calendar year.
        year: i32,
        /// Calendar month.
        month: u32,
    },

    /// A freshly allocated number collided with an existing document twice.
    #[error("Could not allocate a unique {doc_type} number, please retry")]
    AllocationConflict {
        /// The document type being numbered.
        doc_type: DocumentType,
    },
}

impl NumberingError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AllocationConflict { .. } => 503,
            Self::InvalidFormat(_) | Self::UnknownPrefix(_) | Self::InvalidPeriod { .. } => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "INVALID_DOCUMENT_NUMBER",
            Self::UnknownPrefix(_) => "UNKNOWN_DOCUMENT_PREFIX",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::AllocationConflict { .. } => "ALLOCATION_CONFLICT",
        }
    }
}

impl From<NumberingError> for AppError {
    fn from(err: NumberingError) -> Self {
        match err {
            NumberingError::AllocationConflict { .. } => Self::Unavailable(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
