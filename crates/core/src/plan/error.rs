//! Plan operation errors.

use gestor_shared::AppError;
use gestor_shared::types::PlanFieldId;
use thiserror::Error;

use crate::assignment::AssignmentError;
use crate::fields::{FieldError, FieldViolation};
use crate::lifecycle::LifecycleError;
use crate::ports::StoreError;

/// Errors raised by [`PlanService`](crate::plan::PlanService).
#[derive(Debug, Error)]
pub enum PlanError {
    /// Transition or ownership rule refused the operation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Hour allocation refused.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// Broken field configuration.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Required fields have no value.
    #[error("{} required field(s) missing", .0.len())]
    MissingRequiredFields(Vec<PlanFieldId>),

    /// Responses contain malformed values.
    #[error("{} invalid field response(s)", .0.len())]
    InvalidResponses(Vec<FieldViolation>),

    /// Hours only apply to taxonomy-driven plans.
    #[error("Plan type is not structured; it has no hour assignments")]
    NotStructured,

    /// Field responses only apply to custom plans.
    #[error("Plan type is structured; it has no configurable fields")]
    NotCustom,

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlanError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Lifecycle(e) => e.status_code(),
            Self::Assignment(e) => e.status_code(),
            Self::Field(e) => e.status_code(),
            Self::Store(e) => e.status_code(),
            Self::MissingRequiredFields(_) | Self::InvalidResponses(_) => 400,
            Self::NotStructured | Self::NotCustom => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Lifecycle(e) => e.error_code(),
            Self::Assignment(e) => e.error_code(),
            Self::Field(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::MissingRequiredFields(_) => "MISSING_REQUIRED_FIELDS",
            Self::InvalidResponses(_) => "INVALID_RESPONSES",
            Self::NotStructured => "PLAN_NOT_STRUCTURED",
            Self::NotCustom => "PLAN_NOT_CUSTOM",
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InsufficientRole { .. } | LifecycleError::NotOwner { .. } => {
                Self::Forbidden(err.to_string())
            }
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Lifecycle(e) => e.into(),
            PlanError::Store(e) => e.into(),
            PlanError::Assignment(AssignmentError::PlanNotEditable { status }) => {
                Self::BusinessRule(format!("Plan is {status}; assignments are read-only"))
            }
            PlanError::Assignment(e) => Self::Validation(e.to_string()),
            PlanError::MissingRequiredFields(_) | PlanError::InvalidResponses(_) => {
                Self::Validation(err.to_string())
            }
            PlanError::NotStructured | PlanError::NotCustom => Self::BusinessRule(err.to_string()),
            PlanError::Field(e) => Self::Internal(e.to_string()),
        }
    }
}
