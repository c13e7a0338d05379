//! Property-based tests for progress aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use gestor_shared::types::{ManagerReportId, ProductId};

use crate::progress::aggregator::{IMPROVEMENT_PLAN_THRESHOLD, ProgressAggregator};
use crate::progress::book::ProgressBook;
use crate::progress::types::ProgressSnapshot;

/// Percentages 0.00..=100.00 with two decimal places.
fn arb_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn arb_snapshots() -> impl Strategy<Value = Vec<ProgressSnapshot>> {
    prop::collection::vec(arb_percentage().prop_map(ProgressSnapshot::with_percentage), 0..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The mean stays within the range of its inputs.
    #[test]
    fn prop_overall_within_bounds(entries in arb_snapshots()) {
        let overall = ProgressAggregator::overall_progress(&entries);
        prop_assert!(overall <= 100);
        if let (Some(min), Some(max)) = (
            entries.iter().map(|e| e.progress_percentage).min(),
            entries.iter().map(|e| e.progress_percentage).max(),
        ) {
            prop_assert!(Decimal::from(overall) >= min.floor());
            prop_assert!(Decimal::from(overall) <= max.ceil());
        } else {
            prop_assert_eq!(overall, 0);
        }
    }

    /// The mean does not depend on entry order.
    #[test]
    fn prop_overall_order_independent(entries in arb_snapshots()) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(
            ProgressAggregator::overall_progress(&entries),
            ProgressAggregator::overall_progress(&reversed)
        );
    }

    /// Identical entries average to their own rounded value.
    #[test]
    fn prop_uniform_entries(pct in 0u8..=100, count in 1usize..20) {
        let entries = vec![ProgressSnapshot::with_percentage(Decimal::from(pct)); count];
        prop_assert_eq!(ProgressAggregator::overall_progress(&entries), pct);
    }

    /// The improvement-plan flag flips exactly at the threshold.
    #[test]
    fn prop_threshold_boundary(overall in 0u8..=100) {
        prop_assert_eq!(
            ProgressAggregator::requires_improvement_plan(overall),
            overall < IMPROVEMENT_PLAN_THRESHOLD
        );
    }

    /// Editing a product twice leaves a single entry holding the last value.
    #[test]
    fn prop_book_dedups_by_product(first in arb_percentage(), second in arb_percentage()) {
        let product = ProductId::new();
        let mut book = ProgressBook::new(ManagerReportId::new());
        book.set_percentage(product, first).expect("valid percentage");
        book.set_percentage(product, second).expect("valid percentage");
        prop_assert_eq!(book.entries().len(), 1);
        prop_assert_eq!(book.progress_for(product).progress_percentage, second);
    }
}
