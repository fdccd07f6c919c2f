//! Transaction domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tourbook_shared::Amount;
use tourbook_shared::types::UserId;

use crate::ledger::{EntryKind, LedgerDelta};
use crate::numbering::DocumentType;

/// Transaction status.
///
/// The valid transitions are:
/// - Pending → Confirmed (confirm)
/// - Pending → Cancelled (cancel)
/// - Confirmed → Cancelled (cancel, reversing effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Recorded, awaiting confirmation.
    Pending,
    /// Money movement confirmed; effects applied.
    Confirmed,
    /// Terminal.
    Cancelled,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money in.
    Payment,
    /// Money out.
    Refund,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "PAYMENT",
            Self::Refund => "REFUND",
        }
    }

    /// Ledger delta that confirming `amount` of this kind applies.
    #[must_use]
    pub fn ledger_delta(&self, amount: Amount) -> LedgerDelta {
        let kind = match self {
            Self::Payment => EntryKind::Payment,
            Self::Refund => EntryKind::Refund,
        };
        LedgerDelta::new(kind, amount)
    }

    /// Document issued when a customer transaction of this kind is confirmed.
    #[must_use]
    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::Payment => DocumentType::Receipt,
            Self::Refund => DocumentType::CreditNote,
        }
    }

    /// Number series used for the transaction itself.
    #[must_use]
    pub fn number_type(&self, party: Party) -> DocumentType {
        match (party, self) {
            (Party::Customer, Self::Payment) => DocumentType::CustomerPayment,
            (Party::Customer, Self::Refund) => DocumentType::CustomerRefund,
            (Party::Wholesale, Self::Payment) => DocumentType::WholesalePayment,
            (Party::Wholesale, Self::Refund) => DocumentType::WholesaleRefund,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counterparty of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    /// Customer, recorded against an invoice.
    Customer,
    /// Wholesaler, recorded against a quotation.
    Wholesale,
}

/// Who performed a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// An authenticated back-office user.
    User(UserId),
    /// The payment gateway, via webhook.
    Gateway,
}

impl Actor {
    /// Returns the user id, if a user acted.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Gateway => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Gateway => write!(f, "gateway"),
        }
    }
}

/// A validated state transition with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionAction {
    /// Confirm a pending transaction.
    Confirm {
        /// The new status after confirmation.
        new_status: TransactionStatus,
        /// Who confirmed.
        confirmed_by: Actor,
        /// When.
        confirmed_at: DateTime<Utc>,
    },
    /// Cancel a pending or confirmed transaction.
    Cancel {
        /// The new status after cancellation.
        new_status: TransactionStatus,
        /// Who cancelled.
        cancelled_by: Actor,
        /// When.
        cancelled_at: DateTime<Utc>,
        /// Optional reason.
        reason: Option<String>,
        /// True when confirmed effects must be undone.
        reverse_effects: bool,
    },
}

impl TransitionAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> TransactionStatus {
        match self {
            Self::Confirm { new_status, .. } | Self::Cancel { new_status, .. } => *new_status,
        }
    }
}

/// How an amount edit must be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPlan {
    /// Pending: replace fields after re-validating against the invoice.
    Replace,
    /// Confirmed: apply `delta` to the ledger and to the issued document.
    Rebalance {
        /// New amount minus old amount.
        delta: Amount,
    },
}

/// Command accepted by the transaction update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum UpdateAction {
    /// Confirm the transaction.
    Confirm,
    /// Cancel the transaction.
    Cancel {
        /// Optional reason.
        #[serde(default)]
        reason: Option<String>,
    },
}
