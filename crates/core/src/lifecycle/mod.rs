//! Plan and report lifecycle state machines.
//!
//! This module implements the status transitions for work plans and
//! manager reports, including the role gates on approval and review.
//!
//! # Modules
//!
//! - `types` - Status enums and transition audit records
//! - `error` - Lifecycle-specific error types
//! - `plan` - Plan transitions (submit, approve, reject)
//! - `report` - Report transitions (submit, review)

pub mod error;
pub mod plan;
pub mod report;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::LifecycleError;
pub use plan::PlanLifecycle;
pub use report::ReportLifecycle;
pub use types::{PlanStatus, PlanTransition, ReportStatus, ReportTransition};
