//! Transaction service for validation and state transitions.
//!
//! The service is pure: it decides whether an operation is allowed and what
//! it implies. The db crate applies the result inside one database
//! transaction together with the ledger update and document issuance.

use chrono::Utc;
use tourbook_shared::Amount;

use crate::ledger::InvoiceBalance;
use crate::transaction::error::TransactionError;
use crate::transaction::types::{
    Actor, EditPlan, TransactionKind, TransactionStatus, TransitionAction,
};

/// Stateless service for transaction validation and transitions.
pub struct TransactionService;

impl TransactionService {
    /// Validates a new customer transaction against the invoice balance.
    ///
    /// Payments may not exceed the remaining balance and refunds may not
    /// exceed the net paid amount; both bounds are inclusive. Returns the
    /// trimmed refund reason, if any.
    ///
    /// # Errors
    /// * `InvoiceClosed` if the invoice is cancelled or voided
    /// * `InvalidAmount`, `ExceedsRemaining`, `ExceedsRefundable`,
    ///   `RefundReasonRequired` for invalid input
    pub fn validate_create(
        kind: TransactionKind,
        amount: Amount,
        balance: &InvoiceBalance,
        reason: Option<&str>,
    ) -> Result<Option<String>, TransactionError> {
        if balance.status.is_closed() {
            return Err(TransactionError::InvoiceClosed(balance.status));
        }
        let reason = Self::validate_wholesale_create(kind, amount, reason)?;
        Self::check_against_balance(kind, amount, balance)?;
        Ok(reason)
    }

    /// Validates a new wholesale transaction. There is no balance to check.
    pub fn validate_wholesale_create(
        kind: TransactionKind,
        amount: Amount,
        reason: Option<&str>,
    ) -> Result<Option<String>, TransactionError> {
        Self::validate_amount(amount)?;
        let reason = normalize_reason(reason);
        if kind == TransactionKind::Refund && reason.is_none() {
            return Err(TransactionError::RefundReasonRequired);
        }
        Ok(reason)
    }

    /// Checks that `amount` of `kind` fits into `balance`.
    pub fn check_against_balance(
        kind: TransactionKind,
        amount: Amount,
        balance: &InvoiceBalance,
    ) -> Result<(), TransactionError> {
        match kind {
            TransactionKind::Payment => {
                let remaining = balance.remaining();
                if amount > remaining {
                    return Err(TransactionError::ExceedsRemaining { amount, remaining });
                }
            }
            TransactionKind::Refund => {
                let refundable = balance.refundable();
                if amount > refundable {
                    return Err(TransactionError::ExceedsRefundable { amount, refundable });
                }
            }
        }
        Ok(())
    }

    /// Rejects amounts that are not strictly positive.
    pub fn validate_amount(amount: Amount) -> Result<(), TransactionError> {
        if amount.is_positive() {
            Ok(())
        } else {
            Err(TransactionError::InvalidAmount)
        }
    }

    /// Decides whether a new transaction is confirmed on creation.
    ///
    /// An explicit flag wins; otherwise supplying evidence confirms.
    #[must_use]
    pub fn should_auto_confirm(auto_confirm: Option<bool>, evidence_url: Option<&str>) -> bool {
        auto_confirm.unwrap_or_else(|| evidence_url.is_some_and(|url| !url.trim().is_empty()))
    }

    /// Confirm a pending transaction.
    ///
    /// # Returns
    /// * `Ok(TransitionAction::Confirm)` if the transition is valid
    /// * `Err(TransactionError::InvalidTransition)` if not in Pending status
    pub fn confirm(
        current_status: TransactionStatus,
        actor: Actor,
    ) -> Result<TransitionAction, TransactionError> {
        match current_status {
            TransactionStatus::Pending => Ok(TransitionAction::Confirm {
                new_status: TransactionStatus::Confirmed,
                confirmed_by: actor,
                confirmed_at: Utc::now(),
            }),
            _ => Err(TransactionError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Confirmed,
            }),
        }
    }

    /// Cancel a pending or confirmed transaction.
    ///
    /// Cancelling a confirmed transaction sets `reverse_effects`, telling the
    /// caller to undo the ledger adjustment and cancel the issued document.
    ///
    /// # Returns
    /// * `Ok(TransitionAction::Cancel)` if the transition is valid
    /// * `Err(TransactionError::InvalidTransition)` if already cancelled
    pub fn cancel(
        current_status: TransactionStatus,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<TransitionAction, TransactionError> {
        if current_status.is_terminal() {
            return Err(TransactionError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Cancelled,
            });
        }

        Ok(TransitionAction::Cancel {
            new_status: TransactionStatus::Cancelled,
            cancelled_by: actor,
            cancelled_at: Utc::now(),
            reason: normalize_reason(reason.as_deref()),
            reverse_effects: current_status == TransactionStatus::Confirmed,
        })
    }

    /// Plans an amount edit.
    ///
    /// # Returns
    /// * `EditPlan::Replace` while pending
    /// * `EditPlan::Rebalance` with `new_amount - old_amount` while confirmed
    /// * `Err(TransactionError::NotEditable)` once cancelled
    pub fn plan_edit(
        current_status: TransactionStatus,
        old_amount: Amount,
        new_amount: Amount,
    ) -> Result<EditPlan, TransactionError> {
        if current_status.is_terminal() {
            return Err(TransactionError::NotEditable(current_status));
        }
        Self::validate_amount(new_amount)?;

        Ok(if current_status == TransactionStatus::Confirmed {
            EditPlan::Rebalance {
                delta: new_amount - old_amount,
            }
        } else {
            EditPlan::Replace
        })
    }
}

fn normalize_reason(reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(ToString::to_string)
}
