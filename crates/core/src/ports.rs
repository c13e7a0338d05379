//! Collaborator contracts.
//!
//! These traits are implemented by the db crate (and by in-memory fakes in
//! tests). Every call may fail; failures are reported as [`StoreError`] and
//! never retried here.

use std::future::Future;

use gestor_shared::AppError;
use gestor_shared::types::{ManagerReportId, PlanId, PlanTypeId, ReportPeriodId, UserId};
use thiserror::Error;

use crate::assignment::Assignment;
use crate::fields::{FieldResponses, StoredPlanField};
use crate::hierarchy::Linked;
use crate::plan::{Plan, PlanStatusUpdate, PlanType};
use crate::progress::ProductProgressReport;
use crate::report::{ManagerReport, ReportStatusUpdate};
use crate::storage::{EvidenceFile, EvidenceRef, StorageError};
use crate::taxonomy::Taxonomy;

/// Failure reported by a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// A uniqueness or foreign key constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a not found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            Self::Backend(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Backend(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id} not found")),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Database(msg),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else {
            Self::ExternalService(err.to_string())
        }
    }
}

/// Source of the taxonomy a plan type works with.
pub trait TaxonomySource: Send + Sync {
    /// Axes, actions and products tagged for work plans.
    fn fetch_plan_type_elements(
        &self,
        plan_type_id: PlanTypeId,
    ) -> impl Future<Output = Result<Taxonomy, StoreError>> + Send;
}

/// Persistence of plans, their assignments and field responses.
pub trait PlanStore: Send + Sync {
    /// Find a plan type.
    fn fetch_plan_type(
        &self,
        plan_type_id: PlanTypeId,
    ) -> impl Future<Output = Result<PlanType, StoreError>> + Send;

    /// Configured fields of a plan type, in any order.
    fn fetch_plan_fields(
        &self,
        plan_type_id: PlanTypeId,
    ) -> impl Future<Output = Result<Vec<StoredPlanField>, StoreError>> + Send;

    /// Find a plan.
    fn fetch_plan(&self, plan_id: PlanId)
    -> impl Future<Output = Result<Plan, StoreError>> + Send;

    /// Insert a new plan.
    fn create_plan(&self, plan: &Plan) -> impl Future<Output = Result<Plan, StoreError>> + Send;

    /// Write a status change and return the updated plan.
    fn update_plan_status(
        &self,
        plan_id: PlanId,
        update: &PlanStatusUpdate,
    ) -> impl Future<Output = Result<Plan, StoreError>> + Send;

    /// Assignments of a plan with their product → action → axis joins.
    fn fetch_assignments(
        &self,
        plan_id: PlanId,
    ) -> impl Future<Output = Result<Vec<Linked<Assignment>>, StoreError>> + Send;

    /// Insert or update by `(plan_id, product_id)`.
    fn upsert_assignment(
        &self,
        assignment: &Assignment,
    ) -> impl Future<Output = Result<Assignment, StoreError>> + Send;

    /// Replace the field responses of a plan.
    fn save_field_responses(
        &self,
        plan_id: PlanId,
        responses: &FieldResponses,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Field responses of a plan.
    fn fetch_field_responses(
        &self,
        plan_id: PlanId,
    ) -> impl Future<Output = Result<FieldResponses, StoreError>> + Send;

    /// Approved plans owned by a manager.
    fn list_approved_plans(
        &self,
        manager_id: UserId,
    ) -> impl Future<Output = Result<Vec<Plan>, StoreError>> + Send;
}

/// Persistence of manager reports and their progress rows.
pub trait ReportStore: Send + Sync {
    /// The report for `(manager, plan, period)`, if one exists.
    fn find_report(
        &self,
        manager_id: UserId,
        plan_id: PlanId,
        report_period_id: ReportPeriodId,
    ) -> impl Future<Output = Result<Option<ManagerReport>, StoreError>> + Send;

    /// Insert a new report.
    fn create_report(
        &self,
        report: &ManagerReport,
    ) -> impl Future<Output = Result<ManagerReport, StoreError>> + Send;

    /// Find a report.
    fn fetch_report(
        &self,
        report_id: ManagerReportId,
    ) -> impl Future<Output = Result<ManagerReport, StoreError>> + Send;

    /// Progress rows of a report.
    fn fetch_progress_reports(
        &self,
        report_id: ManagerReportId,
    ) -> impl Future<Output = Result<Vec<ProductProgressReport>, StoreError>> + Send;

    /// Insert or update by `(manager_report_id, product_id)`.
    fn upsert_progress_report(
        &self,
        report: &ProductProgressReport,
    ) -> impl Future<Output = Result<ProductProgressReport, StoreError>> + Send;

    /// Write a status change and return the updated report.
    fn update_report_status(
        &self,
        report_id: ManagerReportId,
        update: &ReportStatusUpdate,
    ) -> impl Future<Output = Result<ManagerReport, StoreError>> + Send;
}

/// Blob storage for evidence files.
pub trait EvidenceStore: Send + Sync {
    /// Upload a file and return a stable public reference.
    fn upload_evidence_file(
        &self,
        file: &EvidenceFile,
        bucket: &str,
        path: &str,
    ) -> impl Future<Output = Result<EvidenceRef, StorageError>> + Send;

    /// Bucket evidence is written to.
    fn evidence_bucket(&self) -> &str;
}
