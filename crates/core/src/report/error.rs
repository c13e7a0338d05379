//! Report operation errors.

use gestor_shared::AppError;
use gestor_shared::types::{ManagerReportId, ProductId};
use thiserror::Error;

use crate::lifecycle::LifecycleError;
use crate::ports::StoreError;
use crate::progress::ProgressError;
use crate::storage::StorageError;

/// Errors raised by [`ReportService`](crate::report::ReportService).
#[derive(Debug, Error)]
pub enum ReportError {
    /// Transition or ownership rule refused the operation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Progress value rejected.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// The product has no assignment in the report's plan.
    #[error("Product {product_id} is not assigned in this plan")]
    ProductNotAssigned {
        /// Product that was edited.
        product_id: ProductId,
    },

    /// The progress book was loaded for a different report.
    #[error("Progress book belongs to report {found}, not {expected}")]
    BookMismatch {
        /// Report being written.
        expected: ManagerReportId,
        /// Report the book was created for.
        found: ManagerReportId,
    },

    /// One row of a batch save failed; later rows were not attempted.
    #[error("Saving progress for product {product_id} failed: {source}")]
    ItemSaveFailed {
        /// First product whose save failed.
        product_id: ProductId,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Evidence upload failed; nothing was saved.
    #[error(transparent)]
    Upload(#[from] StorageError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Lifecycle(e) => e.status_code(),
            Self::Progress(_) => 400,
            Self::ProductNotAssigned { .. } => 422,
            Self::BookMismatch { .. } => 409,
            Self::ItemSaveFailed { source, .. } => source.status_code(),
            Self::Upload(e) => {
                if e.is_validation() {
                    400
                } else {
                    502
                }
            }
            Self::Store(e) => e.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Lifecycle(e) => e.error_code(),
            Self::Progress(_) => "INVALID_PROGRESS",
            Self::ProductNotAssigned { .. } => "PRODUCT_NOT_ASSIGNED",
            Self::BookMismatch { .. } => "BOOK_REPORT_MISMATCH",
            Self::ItemSaveFailed { .. } => "ITEM_SAVE_FAILED",
            Self::Upload(_) => "UPLOAD_FAILED",
            Self::Store(e) => e.error_code(),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Lifecycle(e) => e.into(),
            ReportError::Progress(e) => Self::Validation(e.to_string()),
            ReportError::ProductNotAssigned { .. } => Self::BusinessRule(err.to_string()),
            ReportError::BookMismatch { .. } => Self::Conflict(err.to_string()),
            ReportError::ItemSaveFailed { .. } => Self::Database(err.to_string()),
            ReportError::Upload(e) => e.into(),
            ReportError::Store(e) => e.into(),
        }
    }
}
