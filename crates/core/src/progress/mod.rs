//! Progress aggregation for manager reports.
//!
//! Per-product progress is looked up by product id only: two assignments
//! that reference the same product share one snapshot. Overall progress is
//! the unweighted mean of the per-product percentages.
//!
//! # Modules
//!
//! - `types` - Snapshots, persisted progress rows and summaries
//! - `error` - Progress validation errors
//! - `aggregator` - Overall progress and the improvement-plan rule
//! - `book` - Persisted rows merged with local edits

pub mod aggregator;
pub mod book;
pub mod error;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{IMPROVEMENT_PLAN_THRESHOLD, ProgressAggregator};
pub use book::ProgressBook;
pub use error::ProgressError;
pub use types::{ProductProgressReport, ProgressSnapshot, ProgressSummary};
