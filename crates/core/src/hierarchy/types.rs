//! Tree types produced by the organizer.

use gestor_shared::types::{ActionId, StrategicAxisId};
use indexmap::IndexMap;
use serde::Serialize;

use crate::progress::{ProgressAggregator, ProgressSnapshot};
use crate::taxonomy::{Action, Product, StrategicAxis, TaxonomyLinks};

/// An input item paired with its resolved taxonomy joins.
#[derive(Debug, Clone)]
pub struct Linked<T> {
    /// The assignment or progress row.
    pub item: T,
    /// Joined taxonomy records; any level may be missing.
    pub links: TaxonomyLinks,
}

impl<T> Linked<T> {
    /// Pairs an item with its links.
    pub fn new(item: T, links: TaxonomyLinks) -> Self {
        Self { item, links }
    }
}

/// Leaf of the tree: one input item and its product's progress.
#[derive(Debug, Clone, Serialize)]
pub struct ProductLeaf<T> {
    /// The product record.
    pub product: Product,
    /// The original input item.
    pub item: T,
    /// Progress looked up by product id.
    pub progress: ProgressSnapshot,
}

/// An action with its product leaves in input order.
#[derive(Debug, Clone, Serialize)]
pub struct ActionNode<T> {
    /// The action record.
    pub action: Action,
    /// Leaves under this action.
    pub products: Vec<ProductLeaf<T>>,
}

impl<T> ActionNode<T> {
    /// Unweighted mean of the leaf percentages.
    #[must_use]
    pub fn progress(&self) -> u8 {
        ProgressAggregator::mean_percentage(
            self.products.iter().map(|leaf| leaf.progress.progress_percentage),
        )
    }
}

/// A strategic axis with its actions in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct AxisNode<T> {
    /// The axis record.
    pub axis: StrategicAxis,
    /// Actions keyed by id.
    pub actions: IndexMap<ActionId, ActionNode<T>>,
}

impl<T> AxisNode<T> {
    /// Iterates the leaves under this axis.
    pub fn leaves(&self) -> impl Iterator<Item = &ProductLeaf<T>> {
        self.actions.values().flat_map(|node| node.products.iter())
    }

    /// Unweighted mean over all leaves of the axis.
    #[must_use]
    pub fn progress(&self) -> u8 {
        ProgressAggregator::mean_percentage(
            self.leaves().map(|leaf| leaf.progress.progress_percentage),
        )
    }
}

/// Output of [`organize`](crate::hierarchy::organize).
#[derive(Debug, Clone, Serialize)]
pub struct OrganizedTree<T> {
    /// Axes keyed by id, in first-seen order.
    pub axes: IndexMap<StrategicAxisId, AxisNode<T>>,
    /// Number of input items left out for a missing taxonomy link.
    pub dropped: usize,
}

impl<T> Default for OrganizedTree<T> {
    fn default() -> Self {
        Self {
            axes: IndexMap::new(),
            dropped: 0,
        }
    }
}

impl<T> OrganizedTree<T> {
    /// Iterates all leaves in tree order.
    pub fn leaves(&self) -> impl Iterator<Item = &ProductLeaf<T>> {
        self.axes.values().flat_map(AxisNode::leaves)
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Returns true if the tree has no leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Plan-level progress. See [`ProgressAggregator::plan_progress`].
    #[must_use]
    pub fn progress(&self) -> u8 {
        ProgressAggregator::plan_progress(self)
    }
}
