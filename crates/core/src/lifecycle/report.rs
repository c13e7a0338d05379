//! Manager report state machine.

use chrono::Utc;
use gestor_shared::types::UserId;

use crate::context::ActorContext;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::types::{PlanStatus, ReportStatus, ReportTransition};

/// Stateless service for report status transitions.
pub struct ReportLifecycle;

impl ReportLifecycle {
    /// Submit a draft report.
    ///
    /// The parent plan must be Approved. `total_progress_percentage` is the
    /// overall progress recomputed by the caller right before submission.
    pub fn submit(
        current_status: ReportStatus,
        plan_status: PlanStatus,
        submitted_by: UserId,
        total_progress_percentage: u8,
    ) -> Result<ReportTransition, LifecycleError> {
        if plan_status != PlanStatus::Approved {
            return Err(LifecycleError::PlanNotApproved {
                status: plan_status,
            });
        }

        match current_status {
            ReportStatus::Draft => Ok(ReportTransition::Submit {
                new_status: ReportStatus::Submitted,
                submitted_by,
                submitted_at: Utc::now(),
                total_progress_percentage,
            }),
            _ => Err(LifecycleError::InvalidReportTransition {
                from: current_status,
                to: ReportStatus::Submitted,
            }),
        }
    }

    /// Mark a submitted report as reviewed.
    pub fn review(
        current_status: ReportStatus,
        actor: &ActorContext,
    ) -> Result<ReportTransition, LifecycleError> {
        actor.ensure_reviewer("review reports")?;

        match current_status {
            ReportStatus::Submitted => Ok(ReportTransition::Review {
                new_status: ReportStatus::Reviewed,
                reviewed_by: actor.user_id,
                reviewed_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidReportTransition {
                from: current_status,
                to: ReportStatus::Reviewed,
            }),
        }
    }

    /// Fails unless the report can still be edited by its manager.
    pub fn ensure_editable(current_status: ReportStatus) -> Result<(), LifecycleError> {
        if current_status.can_edit() {
            Ok(())
        } else {
            Err(LifecycleError::NotEditable)
        }
    }

    /// Check if a report status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: ReportStatus, to: ReportStatus) -> bool {
        matches!(
            (from, to),
            (ReportStatus::Draft, ReportStatus::Submitted)
                | (ReportStatus::Submitted, ReportStatus::Reviewed)
        )
    }
}
