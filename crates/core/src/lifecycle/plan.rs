//! Plan state machine.
//!
//! Submission is manager-initiated from Draft or Rejected. Approval and
//! rejection require a reviewer and a Submitted plan.

use chrono::Utc;
use gestor_shared::types::UserId;

use crate::context::ActorContext;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::types::{PlanStatus, PlanTransition};

/// Stateless service for plan status transitions.
///
/// All methods are associated functions that validate a transition and
/// return the matching [`PlanTransition`] audit record.
pub struct PlanLifecycle;

impl PlanLifecycle {
    /// Submit a draft or rejected plan for review.
    ///
    /// A rejected plan returns to Submitted; there is no separate
    /// resubmitted state.
    ///
    /// # Returns
    /// * `Ok(PlanTransition::Submit)` if the plan is Draft or Rejected
    /// * `Err(LifecycleError::InvalidPlanTransition)` otherwise
    pub fn submit(
        current_status: PlanStatus,
        submitted_by: UserId,
    ) -> Result<PlanTransition, LifecycleError> {
        if current_status.is_editable() {
            Ok(PlanTransition::Submit {
                new_status: PlanStatus::Submitted,
                submitted_by,
                submitted_at: Utc::now(),
            })
        } else {
            Err(LifecycleError::InvalidPlanTransition {
                from: current_status,
                to: PlanStatus::Submitted,
            })
        }
    }

    /// Approve a submitted plan.
    ///
    /// # Returns
    /// * `Ok(PlanTransition::Approve)` if the actor is a reviewer and the plan is Submitted
    /// * `Err(LifecycleError::InsufficientRole)` for managers
    /// * `Err(LifecycleError::InvalidPlanTransition)` if not Submitted
    pub fn approve(
        current_status: PlanStatus,
        actor: &ActorContext,
        comments: Option<String>,
    ) -> Result<PlanTransition, LifecycleError> {
        actor.ensure_reviewer("approve plans")?;

        match current_status {
            PlanStatus::Submitted => Ok(PlanTransition::Approve {
                new_status: PlanStatus::Approved,
                approved_by: actor.user_id,
                approved_at: Utc::now(),
                comments: normalize_comments(comments),
            }),
            _ => Err(LifecycleError::InvalidPlanTransition {
                from: current_status,
                to: PlanStatus::Approved,
            }),
        }
    }

    /// Reject a submitted plan back to the manager.
    ///
    /// The comment is optional.
    pub fn reject(
        current_status: PlanStatus,
        actor: &ActorContext,
        comments: Option<String>,
    ) -> Result<PlanTransition, LifecycleError> {
        actor.ensure_reviewer("reject plans")?;

        match current_status {
            PlanStatus::Submitted => Ok(PlanTransition::Reject {
                new_status: PlanStatus::Rejected,
                rejected_by: actor.user_id,
                rejected_at: Utc::now(),
                comments: normalize_comments(comments),
            }),
            _ => Err(LifecycleError::InvalidPlanTransition {
                from: current_status,
                to: PlanStatus::Rejected,
            }),
        }
    }

    /// Check if a plan status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → Submitted
    /// - Rejected → Submitted
    /// - Submitted → Approved
    /// - Submitted → Rejected
    #[must_use]
    pub fn is_valid_transition(from: PlanStatus, to: PlanStatus) -> bool {
        matches!(
            (from, to),
            (PlanStatus::Draft | PlanStatus::Rejected, PlanStatus::Submitted)
                | (
                    PlanStatus::Submitted,
                    PlanStatus::Approved | PlanStatus::Rejected
                )
        )
    }
}

fn normalize_comments(comments: Option<String>) -> Option<String> {
    comments.filter(|c| !c.trim().is_empty())
}
