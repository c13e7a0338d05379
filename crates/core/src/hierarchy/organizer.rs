//! The grouping pass.

use gestor_shared::types::ProductId;
use indexmap::map::Entry;

use crate::hierarchy::types::{ActionNode, AxisNode, Linked, OrganizedTree, ProductLeaf};
use crate::progress::ProgressSnapshot;

/// Groups items into an axis → action → product tree.
///
/// Axes appear in the order their first item appears; actions likewise
/// within an axis; leaves keep input order. Items with a missing axis,
/// action or product join are skipped and counted in
/// [`OrganizedTree::dropped`]. Two items for the same product become two
/// leaves sharing one progress snapshot.
///
/// The input is not modified.
pub fn organize<T, F>(items: &[Linked<T>], progress_for: F) -> OrganizedTree<T>
where
    T: Clone,
    F: Fn(ProductId) -> ProgressSnapshot,
{
    let mut tree = OrganizedTree::default();

    for (index, linked) in items.iter().enumerate() {
        let (axis, action, product) = match linked.links.resolve() {
            Ok(levels) => levels,
            Err(missing) => {
                tracing::warn!(
                    index,
                    missing_level = ?missing,
                    "Skipping item without a complete taxonomy path"
                );
                tree.dropped += 1;
                continue;
            }
        };

        let axis_node = match tree.axes.entry(axis.id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(AxisNode {
                axis: axis.clone(),
                actions: indexmap::IndexMap::new(),
            }),
        };
        let action_node = axis_node
            .actions
            .entry(action.id)
            .or_insert_with(|| ActionNode {
                action: action.clone(),
                products: Vec::new(),
            });

        action_node.products.push(ProductLeaf {
            product: product.clone(),
            item: linked.item.clone(),
            progress: progress_for(product.id),
        });
    }

    if tree.dropped > 0 {
        tracing::debug!(
            kept = items.len() - tree.dropped,
            dropped = tree.dropped,
            "Organized items into taxonomy tree"
        );
    }

    tree
}
