//! Property-based tests for the hierarchy organizer.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::hierarchy::organizer::organize;
use crate::hierarchy::types::Linked;
use crate::progress::ProgressSnapshot;
use crate::test_support::TaxonomyFixture;

/// How an input item's joins are damaged.
#[derive(Debug, Clone, Copy)]
enum Damage {
    None,
    NoProduct,
    NoAction,
    NoAxis,
}

fn arb_damage() -> impl Strategy<Value = Damage> {
    prop_oneof![
        6 => Just(Damage::None),
        1 => Just(Damage::NoProduct),
        1 => Just(Damage::NoAction),
        1 => Just(Damage::NoAxis),
    ]
}

/// Items as (product index into the fixture, damage).
fn arb_items() -> impl Strategy<Value = Vec<(usize, Damage)>> {
    prop::collection::vec((0usize..4, arb_damage()), 0..40)
}

fn build(fx: &TaxonomyFixture, spec: &[(usize, Damage)]) -> Vec<Linked<usize>> {
    let products = fx.products();
    spec.iter()
        .enumerate()
        .map(|(index, (product, damage))| {
            let mut linked = fx.linked(index, products[*product].id);
            match damage {
                Damage::None => {}
                Damage::NoProduct => linked.links.product = None,
                Damage::NoAction => linked.links.action = None,
                Damage::NoAxis => linked.links.strategic_axis = None,
            }
            linked
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Leaf count equals the number of fully linked items; the rest are dropped.
    #[test]
    fn prop_leaf_count_matches_resolved_items(spec in arb_items()) {
        let fx = TaxonomyFixture::new();
        let items = build(&fx, &spec);
        let tree = organize(&items, |_| ProgressSnapshot::default());

        let resolved = spec.iter().filter(|(_, d)| matches!(d, Damage::None)).count();
        prop_assert_eq!(tree.leaf_count(), resolved);
        prop_assert_eq!(tree.dropped, spec.len() - resolved);
    }

    /// No axis or action node appears twice.
    #[test]
    fn prop_no_duplicate_nodes(spec in arb_items()) {
        let fx = TaxonomyFixture::new();
        let tree = organize(&build(&fx, &spec), |_| ProgressSnapshot::default());

        let mut actions = HashSet::new();
        for (axis_id, axis) in &tree.axes {
            prop_assert_eq!(*axis_id, axis.axis.id);
            for (action_id, action) in &axis.actions {
                prop_assert!(actions.insert(*action_id));
                prop_assert_eq!(action.action.strategic_axis_id, *axis_id);
                for leaf in &action.products {
                    prop_assert_eq!(leaf.product.action_id, *action_id);
                }
            }
        }
    }

    /// Same input, same tree; leaves keep their relative input order.
    #[test]
    fn prop_deterministic_and_order_preserving(spec in arb_items()) {
        let fx = TaxonomyFixture::new();
        let items = build(&fx, &spec);
        let first = organize(&items, |_| ProgressSnapshot::default());
        let second = organize(&items, |_| ProgressSnapshot::default());

        let order_a: Vec<usize> = first.leaves().map(|leaf| leaf.item).collect();
        let order_b: Vec<usize> = second.leaves().map(|leaf| leaf.item).collect();
        prop_assert_eq!(&order_a, &order_b);

        for action in first.axes.values().flat_map(|axis| axis.actions.values()) {
            let indices: Vec<usize> = action.products.iter().map(|leaf| leaf.item).collect();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
