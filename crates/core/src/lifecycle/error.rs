//! Lifecycle error types for plan and report transitions.

use gestor_shared::types::UserId;
use thiserror::Error;

use crate::context::UserRole;
use crate::lifecycle::types::{PlanStatus, ReportStatus};

/// Errors that can occur during plan or report transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Attempted an invalid plan status transition.
    #[error("Invalid plan transition from {from} to {to}")]
    InvalidPlanTransition {
        /// The current status.
        from: PlanStatus,
        /// The attempted target status.
        to: PlanStatus,
    },

    /// Attempted an invalid report status transition.
    #[error("Invalid report transition from {from} to {to}")]
    InvalidReportTransition {
        /// The current status.
        from: ReportStatus,
        /// The attempted target status.
        to: ReportStatus,
    },

    /// The actor's role may not trigger this transition.
    #[error("Role {role} may not {action}")]
    InsufficientRole {
        /// The actor's role.
        role: UserRole,
        /// The attempted action.
        action: &'static str,
    },

    /// The actor does not own the plan or report.
    #[error("User {user_id} does not own this record")]
    NotOwner {
        /// The acting user.
        user_id: UserId,
    },

    /// Reports can only be filed against approved plans.
    #[error("Plan is {status}; reports require an approved plan")]
    PlanNotApproved {
        /// The plan's current status.
        status: PlanStatus,
    },

    /// The parent record is frozen.
    #[error("Record is read-only in its current status")]
    NotEditable,
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPlanTransition { .. }
            | Self::InvalidReportTransition { .. }
            | Self::PlanNotApproved { .. }
            | Self::NotEditable => 400,

            Self::InsufficientRole { .. } | Self::NotOwner { .. } => 403,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPlanTransition { .. } | Self::InvalidReportTransition { .. } => {
                "INVALID_TRANSITION"
            }
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::NotOwner { .. } => "NOT_OWNER",
            Self::PlanNotApproved { .. } => "PLAN_NOT_APPROVED",
            Self::NotEditable => "NOT_EDITABLE",
        }
    }
}
