//! Property-based tests for `InvoiceLedger`.

use proptest::prelude::*;
use tourbook_shared::Amount;

use crate::ledger::service::InvoiceLedger;
use crate::ledger::types::{EntryKind, InvoiceBalance, InvoiceStatus, LedgerDelta};

/// Amounts between 0.01 and 100,000.00.
fn arb_amount() -> impl Strategy<Value = Amount> {
    (1i64..=10_000_000).prop_map(Amount::from_minor)
}

fn arb_kind() -> impl Strategy<Value = EntryKind> {
    prop_oneof![Just(EntryKind::Payment), Just(EntryKind::Refund)]
}

/// A balance that already satisfies the invariant.
fn arb_balance() -> impl Strategy<Value = InvoiceBalance> {
    (1i64..=10_000_000)
        .prop_flat_map(|grand| (Just(grand), 0..=grand))
        .prop_flat_map(|(grand, net)| (Just(grand), Just(net), 0i64..=5_000_000))
        .prop_map(|(grand, net, refunded)| {
            let mut balance = InvoiceBalance::issued(Amount::from_minor(grand));
            balance.paid_amount = Amount::from_minor(net + refunded);
            balance.refunded_amount = Amount::from_minor(refunded);
            balance.status = InvoiceLedger::derive_status(&balance, false);
            balance
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any accepted mutation keeps 0 <= net paid <= grand total.
    #[test]
    fn prop_apply_preserves_invariant(
        balance in arb_balance(),
        kind in arb_kind(),
        amount in arb_amount(),
        negate in any::<bool>(),
    ) {
        let amount = if negate { -amount } else { amount };
        if let Ok(next) = InvoiceLedger::apply(&balance, LedgerDelta::new(kind, amount)) {
            prop_assert!(!next.net_paid().is_negative());
            prop_assert!(next.net_paid() <= next.grand_total);
            prop_assert!(!next.paid_amount.is_negative());
            prop_assert!(!next.refunded_amount.is_negative());
            prop_assert_eq!(next.grand_total, balance.grand_total);
        }
    }

    /// A rejected mutation would have broken the invariant.
    #[test]
    fn prop_rejection_only_when_invariant_breaks(
        balance in arb_balance(),
        kind in arb_kind(),
        amount in arb_amount(),
    ) {
        let result = InvoiceLedger::apply(&balance, LedgerDelta::new(kind, amount));
        let net_after = match kind {
            EntryKind::Payment => balance.net_paid() + amount,
            EntryKind::Refund => balance.net_paid() - amount,
        };
        let valid = !net_after.is_negative() && net_after <= balance.grand_total;
        prop_assert_eq!(result.is_ok(), valid);
    }

    /// Applying a delta and then its inverse restores the balance exactly.
    #[test]
    fn prop_inverse_restores_balance(
        balance in arb_balance(),
        kind in arb_kind(),
        amount in arb_amount(),
    ) {
        if let Ok(applied) = InvoiceLedger::apply(&balance, LedgerDelta::new(kind, amount)) {
            let delta = LedgerDelta::new(kind, amount).inverse();
            let restored = InvoiceLedger::apply(&applied, delta).unwrap();
            prop_assert_eq!(restored.paid_amount, balance.paid_amount);
            prop_assert_eq!(restored.refunded_amount, balance.refunded_amount);
            if kind == EntryKind::Payment || balance.net_paid().is_positive() {
                prop_assert_eq!(restored.status, balance.status);
            }
        }
    }

    /// Status always agrees with the aggregates.
    #[test]
    fn prop_status_matches_aggregates(
        balance in arb_balance(),
        amount in arb_amount(),
    ) {
        if let Ok(next) = InvoiceLedger::apply(&balance, LedgerDelta::new(EntryKind::Payment, amount)) {
            let net = next.net_paid();
            let expected = if net >= next.grand_total {
                InvoiceStatus::Paid
            } else {
                InvoiceStatus::PartialPaid
            };
            prop_assert_eq!(next.status, expected);
        }
    }
}
