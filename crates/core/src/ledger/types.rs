//! Invoice ledger domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use tourbook_shared::Amount;

/// Lifecycle status of an invoice.
///
/// `Issued`, `PartialPaid`, `Paid` and the refund-driven `Cancelled` are
/// derived from the aggregates; `Voided` is only ever set by a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Issued, nothing paid yet.
    Issued,
    /// Some but not all of the grand total has been paid.
    PartialPaid,
    /// Net paid amount covers the grand total.
    Paid,
    /// Refunds brought the net paid amount back to zero.
    Cancelled,
    /// Voided by a user; accepts no further money movement.
    Voided,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "ISSUED",
            Self::PartialPaid => "PARTIAL_PAID",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
            Self::Voided => "VOIDED",
        }
    }

    /// Returns true if the invoice no longer accepts new transactions.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Voided)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of money movement recorded against an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Money received from the customer.
    Payment,
    /// Money returned to the customer.
    Refund,
}

/// A signed change to one of the invoice aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerDelta {
    /// Which aggregate changes.
    pub kind: EntryKind,
    /// Signed amount added to the aggregate.
    pub amount: Amount,
}

impl LedgerDelta {
    /// Creates a delta.
    #[must_use]
    pub const fn new(kind: EntryKind, amount: Amount) -> Self {
        Self { kind, amount }
    }

    /// Returns the delta that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            kind: self.kind,
            amount: -self.amount,
        }
    }

    /// Returns true if applying this delta grows the refunded amount.
    #[must_use]
    pub fn increases_refunds(&self) -> bool {
        self.kind == EntryKind::Refund && self.amount.is_positive()
    }
}

/// Monetary aggregate of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceBalance {
    /// Grand total fixed at issuance.
    pub grand_total: Amount,
    /// Sum of confirmed payments.
    pub paid_amount: Amount,
    /// Sum of confirmed refunds.
    pub refunded_amount: Amount,
    /// Current status.
    pub status: InvoiceStatus,
}

impl InvoiceBalance {
    /// Creates the balance of a freshly issued invoice.
    #[must_use]
    pub fn issued(grand_total: Amount) -> Self {
        Self {
            grand_total,
            paid_amount: Amount::ZERO,
            refunded_amount: Amount::ZERO,
            status: InvoiceStatus::Issued,
        }
    }

    /// Payments minus refunds.
    #[must_use]
    pub fn net_paid(&self) -> Amount {
        self.paid_amount - self.refunded_amount
    }

    /// Amount still payable before the invoice is fully paid.
    #[must_use]
    pub fn remaining(&self) -> Amount {
        (self.grand_total - self.net_paid()).clamp_zero()
    }

    /// Amount that can still be refunded.
    #[must_use]
    pub fn refundable(&self) -> Amount {
        self.net_paid().clamp_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use rust_decimal::Decimal;

    fn balance(grand: Decimal, paid: Decimal, refunded: Decimal) -> InvoiceBalance {
        InvoiceBalance {
            grand_total: Amount::new(grand),
            paid_amount: Amount::new(paid),
            refunded_amount: Amount::new(refunded),
            status: InvoiceStatus::PartialPaid,
        }
    }

    #[test]
    fn test_remaining_and_refundable() {
        let b = balance(dec!(10000), dec!(4000), dec!(1000));
        assert_eq!(b.net_paid(), Amount::new(dec!(3000)));
        assert_eq!(b.remaining(), Amount::new(dec!(7000)));
        assert_eq!(b.refundable(), Amount::new(dec!(3000)));
    }

    #[test]
    fn test_issued_balance_is_empty() {
        let b = InvoiceBalance::issued(Amount::new(dec!(500)));
        assert_eq!(b.status, InvoiceStatus::Issued);
        assert_eq!(b.remaining(), Amount::new(dec!(500)));
        assert_eq!(b.refundable(), Amount::ZERO);
    }

    #[test]
    fn test_delta_inverse() {
        let delta = LedgerDelta::new(EntryKind::Refund, Amount::new(dec!(250)));
        assert!(delta.increases_refunds());
        assert!(!delta.inverse().increases_refunds());
        assert_eq!(delta.inverse().inverse(), delta);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(InvoiceStatus::PartialPaid.as_str(), "PARTIAL_PAID");
        assert_eq!(InvoiceStatus::Paid.to_string(), "PAID");
        assert!(InvoiceStatus::Cancelled.is_closed());
        assert!(InvoiceStatus::Voided.is_closed());
        assert!(!InvoiceStatus::Paid.is_closed());
    }
}
