//! Assignment builder: hour allocation against work-plan products.
//!
//! # Modules
//!
//! - `types` - Assignments and the advisory hour budget
//! - `error` - Assignment validation errors
//! - `builder` - The editable assignment set of one plan

pub mod builder;
pub mod error;
pub mod types;

pub use builder::{AssignmentBuilder, parse_hours, validate_hours};
pub use error::AssignmentError;
pub use types::{Assignment, HOURS_SCALE, HourBudget, MAX_HOURS};
