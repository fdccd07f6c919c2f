//! Property-based tests for `TransactionService`.

use proptest::prelude::*;
use tourbook_shared::Amount;
use tourbook_shared::types::UserId;
use uuid::Uuid;

use crate::ledger::{InvoiceBalance, InvoiceLedger};
use crate::transaction::error::TransactionError;
use crate::transaction::service::TransactionService;
use crate::transaction::types::{Actor, TransactionKind, TransactionStatus, TransitionAction};

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Confirmed),
        Just(TransactionStatus::Cancelled),
    ]
}

fn arb_actor() -> impl Strategy<Value = Actor> {
    prop_oneof![
        Just(Actor::Gateway),
        any::<u128>().prop_map(|n| Actor::User(UserId::from_uuid(Uuid::from_u128(n)))),
    ]
}

fn arb_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Payment), Just(TransactionKind::Refund)]
}

/// Balance with grand total, net paid and refunded in minor units.
fn arb_balance() -> impl Strategy<Value = InvoiceBalance> {
    (1i64..=1_000_000)
        .prop_flat_map(|grand| (Just(grand), 0..=grand, 0i64..=100_000))
        .prop_map(|(grand, net, refunded)| {
            let mut b = InvoiceBalance::issued(Amount::from_minor(grand));
            b.paid_amount = Amount::from_minor(net + refunded);
            b.refunded_amount = Amount::from_minor(refunded);
            b.status = InvoiceLedger::derive_status(&b, false);
            b
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Confirm succeeds exactly from Pending.
    #[test]
    fn prop_confirm_only_from_pending(status in arb_status(), actor in arb_actor()) {
        let result = TransactionService::confirm(status, actor);
        if status == TransactionStatus::Pending {
            let action = result.unwrap();
            prop_assert_eq!(action.new_status(), TransactionStatus::Confirmed);
            if let TransitionAction::Confirm { confirmed_by, .. } = action {
                prop_assert_eq!(confirmed_by, actor);
            } else {
                prop_assert!(false, "Expected Confirm action");
            }
        } else {
            let is_invalid_transition = matches!(result, Err(TransactionError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// Cancelled is terminal: no operation leaves it.
    #[test]
    fn prop_cancelled_is_terminal(actor in arb_actor(), old in 1i64..1_000_000, new in 1i64..1_000_000) {
        prop_assert!(TransactionService::confirm(TransactionStatus::Cancelled, actor).is_err());
        prop_assert!(TransactionService::cancel(TransactionStatus::Cancelled, actor, None).is_err());
        prop_assert!(TransactionService::plan_edit(
            TransactionStatus::Cancelled,
            Amount::from_minor(old),
            Amount::from_minor(new),
        ).is_err());
    }

    /// Accepted transactions fit the balance once confirmed.
    #[test]
    fn prop_accepted_create_keeps_ledger_valid(
        balance in arb_balance(),
        kind in arb_kind(),
        minor in 1i64..=2_000_000,
    ) {
        let amount = Amount::from_minor(minor);
        if TransactionService::validate_create(kind, amount, &balance, Some("reason")).is_ok() {
            let applied = InvoiceLedger::apply(&balance, kind.ledger_delta(amount));
            prop_assert!(applied.is_ok());
        }
    }

    /// Validation and the ledger agree on every boundary.
    #[test]
    fn prop_create_matches_ledger_bounds(
        balance in arb_balance(),
        kind in arb_kind(),
        minor in 1i64..=2_000_000,
    ) {
        let amount = Amount::from_minor(minor);
        let validated = TransactionService::validate_create(kind, amount, &balance, Some("reason")).is_ok();
        let applied = InvoiceLedger::apply(&balance, kind.ledger_delta(amount)).is_ok();
        prop_assert_eq!(validated, applied);
    }
}
