//! Lifecycle domain types for plans and reports.

use chrono::{DateTime, Utc};
use gestor_shared::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plan status in the approval workflow.
///
/// The valid transitions are:
/// - Draft → Submitted (submit)
/// - Rejected → Submitted (resubmit)
/// - Submitted → Approved (approve)
/// - Submitted → Rejected (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Being prepared by the manager.
    Draft,
    /// Waiting for a coordinator or administrator.
    Submitted,
    /// Accepted; reports may be filed against it.
    Approved,
    /// Sent back to the manager for changes.
    Rejected,
}

impl PlanStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the manager may still change the plan.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// Returns true if no further transition is defined.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Manager report status.
///
/// Draft → Submitted (submit) → Reviewed (review).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Being filled in by the manager.
    Draft,
    /// Handed in; read-only for the manager.
    Submitted,
    /// Reviewed by a coordinator or administrator.
    Reviewed,
}

impl ReportStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "reviewed" => Some(Self::Reviewed),
            _ => None,
        }
    }

    /// Returns true if the manager may still edit the report.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plan transition with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanTransition {
    /// Draft or rejected plan handed in for review.
    Submit {
        /// The new status after submission.
        new_status: PlanStatus,
        /// The manager who submitted.
        submitted_by: UserId,
        /// When the plan was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Submitted plan accepted.
    Approve {
        /// The new status after approval.
        new_status: PlanStatus,
        /// The reviewer.
        approved_by: UserId,
        /// When the plan was approved.
        approved_at: DateTime<Utc>,
        /// Optional reviewer comments.
        comments: Option<String>,
    },
    /// Submitted plan sent back.
    Reject {
        /// The new status after rejection.
        new_status: PlanStatus,
        /// The reviewer.
        rejected_by: UserId,
        /// When the plan was rejected.
        rejected_at: DateTime<Utc>,
        /// Optional reviewer comments.
        comments: Option<String>,
    },
}

impl PlanTransition {
    /// Returns the new status resulting from this transition.
    #[must_use]
    pub fn new_status(&self) -> PlanStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }
}

/// Report transition with audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTransition {
    /// Draft report handed in.
    Submit {
        /// The new status after submission.
        new_status: ReportStatus,
        /// The manager who submitted.
        submitted_by: UserId,
        /// When the report was submitted.
        submitted_at: DateTime<Utc>,
        /// Overall progress recomputed at submission.
        total_progress_percentage: u8,
    },
    /// Submitted report reviewed.
    Review {
        /// The new status after review.
        new_status: ReportStatus,
        /// The reviewer.
        reviewed_by: UserId,
        /// When the report was reviewed.
        reviewed_at: DateTime<Utc>,
    },
}

impl ReportTransition {
    /// Returns the new status resulting from this transition.
    #[must_use]
    pub fn new_status(&self) -> ReportStatus {
        match self {
            Self::Submit { new_status, .. } | Self::Review { new_status, .. } => *new_status,
        }
    }
}
