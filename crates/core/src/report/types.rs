//! Report domain types.

use chrono::{DateTime, Utc};
use gestor_shared::types::{ManagerReportId, PlanId, ReportPeriodId, UserId};
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::hierarchy::OrganizedTree;
use crate::lifecycle::{ReportStatus, ReportTransition};
use crate::progress::{ProgressBook, ProgressSummary};

/// A manager's report for one plan and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerReport {
    /// Report ID.
    pub id: ManagerReportId,
    /// Owning manager.
    pub manager_id: UserId,
    /// Approved plan the report is written against.
    pub plan_id: PlanId,
    /// Reporting period.
    pub report_period_id: ReportPeriodId,
    /// Title.
    pub title: String,
    /// Workflow status.
    pub status: ReportStatus,
    /// Submission time.
    pub submitted_date: Option<DateTime<Utc>>,
    /// Overall progress recomputed at submission.
    pub total_progress_percentage: Option<u8>,
    /// Reviewer.
    pub reviewed_by: Option<UserId>,
    /// Review time.
    pub reviewed_date: Option<DateTime<Utc>>,
}

impl ManagerReport {
    /// A new draft report.
    #[must_use]
    pub fn new_draft(
        manager_id: UserId,
        plan_id: PlanId,
        report_period_id: ReportPeriodId,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: ManagerReportId::new(),
            manager_id,
            plan_id,
            report_period_id,
            title: title.into(),
            status: ReportStatus::Draft,
            submitted_date: None,
            total_progress_percentage: None,
            reviewed_by: None,
            reviewed_date: None,
        }
    }

    /// Returns true while the manager may still edit the report.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.status.can_edit()
    }

    /// Applies a status update in place.
    pub fn apply(&mut self, update: &ReportStatusUpdate) {
        self.status = update.status;
        if let Some(submitted_date) = update.submitted_date {
            self.submitted_date = Some(submitted_date);
        }
        if let Some(total) = update.total_progress_percentage {
            self.total_progress_percentage = Some(total);
        }
        if let Some(review) = &update.review {
            self.reviewed_by = Some(review.reviewed_by);
            self.reviewed_date = Some(review.reviewed_date);
        }
    }
}

/// Reviewer stamp written with a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportReview {
    /// Reviewer.
    pub reviewed_by: UserId,
    /// Review time.
    pub reviewed_date: DateTime<Utc>,
}

/// Columns written by a report status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatusUpdate {
    /// New status.
    pub status: ReportStatus,
    /// Set on submit.
    pub submitted_date: Option<DateTime<Utc>>,
    /// Set on submit.
    pub total_progress_percentage: Option<u8>,
    /// Set on review.
    pub review: Option<ReportReview>,
}

impl From<&ReportTransition> for ReportStatusUpdate {
    fn from(transition: &ReportTransition) -> Self {
        match transition {
            ReportTransition::Submit {
                new_status,
                submitted_at,
                total_progress_percentage,
                ..
            } => Self {
                status: *new_status,
                submitted_date: Some(*submitted_at),
                total_progress_percentage: Some(*total_progress_percentage),
                review: None,
            },
            ReportTransition::Review {
                new_status,
                reviewed_by,
                reviewed_at,
            } => Self {
                status: *new_status,
                submitted_date: None,
                total_progress_percentage: None,
                review: Some(ReportReview {
                    reviewed_by: *reviewed_by,
                    reviewed_date: *reviewed_at,
                }),
            },
        }
    }
}

/// Everything needed to display and edit one report.
#[derive(Debug, Clone)]
pub struct ReportView {
    /// The report.
    pub report: ManagerReport,
    /// Stored progress rows, ready for local edits.
    pub book: ProgressBook,
    /// Plan assignments grouped by axis and action, with progress.
    pub tree: OrganizedTree<Assignment>,
    /// Overall progress over the assigned products.
    pub summary: ProgressSummary,
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSubmission {
    /// The report after the status change.
    pub report: ManagerReport,
    /// Progress summary the stored total was taken from.
    pub summary: ProgressSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ActorContext, UserRole};
    use crate::lifecycle::{PlanStatus, ReportLifecycle};

    fn draft() -> ManagerReport {
        ManagerReport::new_draft(
            UserId::new(),
            PlanId::new(),
            ReportPeriodId::new(),
            "Informe 2026-1",
        )
    }

    #[test]
    fn test_new_draft_is_editable() {
        let report = draft();
        assert_eq!(report.status, ReportStatus::Draft);
        assert!(report.can_edit());
        assert!(report.total_progress_percentage.is_none());
    }

    #[test]
    fn test_apply_submit_then_review() {
        let mut report = draft();
        let submit = ReportLifecycle::submit(
            report.status,
            PlanStatus::Approved,
            report.manager_id,
            42,
        )
        .unwrap();
        report.apply(&ReportStatusUpdate::from(&submit));

        assert_eq!(report.status, ReportStatus::Submitted);
        assert_eq!(report.total_progress_percentage, Some(42));
        assert!(report.submitted_date.is_some());
        assert!(!report.can_edit());

        let coordinator = ActorContext::new(UserId::new(), UserRole::Coordinator);
        let review = ReportLifecycle::review(report.status, &coordinator).unwrap();
        report.apply(&ReportStatusUpdate::from(&review));

        assert_eq!(report.status, ReportStatus::Reviewed);
        assert_eq!(report.reviewed_by, Some(coordinator.user_id));
        assert_eq!(report.total_progress_percentage, Some(42));
    }
}
