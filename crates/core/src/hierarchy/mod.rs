//! Hierarchy organizer.
//!
//! Regroups a flat list of assignments or progress rows into an
//! axis → action → product tree. Grouping follows first-seen order so the
//! output is stable for a given input.

pub mod organizer;
pub mod types;

#[cfg(test)]
mod organizer_props;

pub use organizer::organize;
pub use types::{ActionNode, AxisNode, Linked, OrganizedTree, ProductLeaf};
