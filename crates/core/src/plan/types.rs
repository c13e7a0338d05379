//! Plan domain types.

use chrono::{DateTime, Utc};
use gestor_shared::types::{PlanId, PlanTypeId, UserId};
use serde::{Deserialize, Serialize};

use crate::lifecycle::{PlanStatus, PlanTransition};

/// Kind of plan a manager can create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanType {
    /// Plan type ID.
    pub id: PlanTypeId,
    /// Display name.
    pub name: String,
    /// Taxonomy-driven when true, field-list driven otherwise.
    pub uses_structured_elements: bool,
    /// Optional description.
    pub description: Option<String>,
}

/// A manager's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan ID.
    pub id: PlanId,
    /// Plan type.
    pub plan_type_id: PlanTypeId,
    /// Owning manager.
    pub manager_id: UserId,
    /// Title.
    pub title: String,
    /// Workflow status.
    pub status: PlanStatus,
    /// Last submission time.
    pub submitted_date: Option<DateTime<Utc>>,
    /// Approval time.
    pub approved_date: Option<DateTime<Utc>>,
    /// Comments of the last approval or rejection.
    pub approval_comments: Option<String>,
    /// Reviewer of the last approval or rejection.
    pub approved_by: Option<UserId>,
}

impl Plan {
    /// A new draft plan.
    #[must_use]
    pub fn new_draft(plan_type_id: PlanTypeId, manager_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: PlanId::new(),
            plan_type_id,
            manager_id,
            title: title.into(),
            status: PlanStatus::Draft,
            submitted_date: None,
            approved_date: None,
            approval_comments: None,
            approved_by: None,
        }
    }

    /// Applies a status update in memory, the same way the store does.
    pub fn apply(&mut self, update: &PlanStatusUpdate) {
        self.status = update.status;
        if let Some(submitted) = update.submitted_date {
            self.submitted_date = Some(submitted);
        }
        if let Some(review) = &update.review {
            self.approved_by = Some(review.reviewed_by);
            self.approved_date = review.approved_date;
            self.approval_comments.clone_from(&review.comments);
        }
    }
}

/// Reviewer data written by approve and reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReview {
    /// The coordinator or administrator.
    pub reviewed_by: UserId,
    /// Set on approval only.
    pub approved_date: Option<DateTime<Utc>>,
    /// Replaces any earlier comment.
    pub comments: Option<String>,
}

/// Fields written by a plan transition.
///
/// Submission leaves the review fields untouched, so the comments of a
/// rejection stay readable after the plan is resubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStatusUpdate {
    /// New status.
    pub status: PlanStatus,
    /// Set on submission.
    pub submitted_date: Option<DateTime<Utc>>,
    /// Set on approval and rejection.
    pub review: Option<PlanReview>,
}

impl From<&PlanTransition> for PlanStatusUpdate {
    fn from(transition: &PlanTransition) -> Self {
        match transition {
            PlanTransition::Submit {
                new_status,
                submitted_at,
                ..
            } => Self {
                status: *new_status,
                submitted_date: Some(*submitted_at),
                review: None,
            },
            PlanTransition::Approve {
                new_status,
                approved_by,
                approved_at,
                comments,
            } => Self {
                status: *new_status,
                submitted_date: None,
                review: Some(PlanReview {
                    reviewed_by: *approved_by,
                    approved_date: Some(*approved_at),
                    comments: comments.clone(),
                }),
            },
            PlanTransition::Reject {
                new_status,
                rejected_by,
                comments,
                ..
            } => Self {
                status: *new_status,
                submitted_date: None,
                review: Some(PlanReview {
                    reviewed_by: *rejected_by,
                    approved_date: None,
                    comments: comments.clone(),
                }),
            },
        }
    }
}
