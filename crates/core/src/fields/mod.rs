//! Dynamic field engine for custom plan types.
//!
//! A plan type without structured elements describes its content as an
//! ordered list of fields. The engine turns that list into renderable
//! specs for the acting user and checks responses before submission.
//!
//! # Modules
//!
//! - `kind` - Closed set of field kinds and derived-value sources
//! - `types` - Field definitions, responses and resolved specs
//! - `error` - Field configuration errors
//! - `engine` - Resolution and validation

pub mod engine;
pub mod error;
pub mod kind;
pub mod types;

pub use engine::FieldEngine;
pub use error::FieldError;
pub use kind::{DerivedSource, FieldKind};
pub use types::{
    FieldInput, FieldOption, FieldResponses, FieldSpec, FieldValue, FieldViolation, PlanField,
    StoredPlanField,
};
