//! Taxonomy error types.

use gestor_shared::types::{ActionId, ProductId, StrategicAxisId};
use thiserror::Error;

/// Taxonomy consistency errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    /// An action points at a strategic axis that is not loaded.
    #[error("action {action_id} references missing strategic axis {strategic_axis_id}")]
    DanglingAction {
        /// The action.
        action_id: ActionId,
        /// The missing parent.
        strategic_axis_id: StrategicAxisId,
    },

    /// A product points at an action that is not loaded.
    #[error("product {product_id} references missing action {action_id}")]
    DanglingProduct {
        /// The product.
        product_id: ProductId,
        /// The missing parent.
        action_id: ActionId,
    },

    /// Unknown usage tag label.
    #[error("unknown usage tag: {0}")]
    UnknownUsageTag(String),
}
