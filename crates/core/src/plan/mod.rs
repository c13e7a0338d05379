//! Work plans: creation, hour allocation, custom field responses and the
//! approval workflow.
//!
//! # Modules
//!
//! - `types` - Plans, plan types and status updates
//! - `error` - Plan operation errors
//! - `service` - Orchestration over the plan store

pub mod error;
pub mod service;
pub mod types;

pub use error::PlanError;
pub use service::PlanService;
pub use types::{Plan, PlanReview, PlanStatusUpdate, PlanType};
