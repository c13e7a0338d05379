//! Core business logic for Gestor.
//!
//! This crate contains the work-plan and report lifecycle engine with ZERO
//! web or database dependencies. Storage, uploads and identity are reached
//! only through the collaborator contracts in [`ports`].
//!
//! # Modules
//!
//! - `context` - Explicit actor identity, role and profile
//! - `taxonomy` - Strategic axis, action and product records
//! - `assignment` - Hour allocation against products
//! - `hierarchy` - Axis → action → product tree organization
//! - `progress` - Per-product and overall progress aggregation
//! - `lifecycle` - Plan and report status state machines
//! - `fields` - Configurable plan-type field resolution and validation
//! - `storage` - Evidence file storage over OpenDAL
//! - `ports` - Collaborator contracts for storage and uploads
//! - `plan` / `report` - Orchestration of user actions

pub mod assignment;
pub mod context;
pub mod fields;
pub mod hierarchy;
pub mod lifecycle;
pub mod plan;
pub mod ports;
pub mod progress;
pub mod report;
pub mod storage;
pub mod taxonomy;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{ActorContext, ActorProfile, UserRole};
