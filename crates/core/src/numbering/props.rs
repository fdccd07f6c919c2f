//! Property-based tests for document numbers.

use proptest::prelude::*;

use crate::numbering::types::{DocumentNumber, DocumentType, Period};

fn arb_doc_type() -> impl Strategy<Value = DocumentType> {
    prop::sample::select(DocumentType::ALL.to_vec())
}

fn arb_period() -> impl Strategy<Value = Period> {
    (2000i32..=2099, 1u32..=12).prop_map(|(year, month)| Period { year, month })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Formatting then parsing yields the same number.
    #[test]
    fn prop_parse_inverts_display(
        doc_type in arb_doc_type(),
        period in arb_period(),
        sequence in 1u32..1_000_000,
    ) {
        let number = DocumentNumber::new(doc_type, period, sequence);
        let parsed = DocumentNumber::parse(&number.to_string()).unwrap();
        prop_assert_eq!(parsed, number);
    }

    /// Within one period, numbering order follows sequence order.
    #[test]
    fn prop_sequence_order_is_numeric(
        doc_type in arb_doc_type(),
        period in arb_period(),
        a in 1u32..100_000,
        b in 1u32..100_000,
    ) {
        prop_assume!(a != b);
        let first = DocumentNumber::new(doc_type, period, a.min(b));
        let second = DocumentNumber::new(doc_type, period, a.max(b));
        let first = DocumentNumber::parse(&first.to_string()).unwrap();
        let second = DocumentNumber::parse(&second.to_string()).unwrap();
        prop_assert!(first.sequence < second.sequence);
    }

    /// Every number starts with its type prefix and keeps at least four sequence digits.
    #[test]
    fn prop_layout(
        doc_type in arb_doc_type(),
        period in arb_period(),
        sequence in 1u32..1_000_000,
    ) {
        let text = DocumentNumber::new(doc_type, period, sequence).to_string();
        prop_assert!(text.starts_with(doc_type.prefix()));
        let (_, seq) = text.split_once('-').unwrap();
        prop_assert!(seq.len() >= 4);
    }
}
