//! Progress domain types.

use gestor_shared::types::{AssignmentId, ManagerReportId, ProductId, ProgressReportId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::progress::error::ProgressError;

/// Progress of one product as seen by a report.
///
/// The default is the "nothing recorded yet" state: 0%, no observations,
/// no evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Completion percentage, 0..=100.
    pub progress_percentage: Decimal,
    /// Free-text observations.
    pub observations: String,
    /// Public URLs of uploaded evidence.
    pub evidence_files: Vec<String>,
    /// Original file names, parallel to `evidence_files`.
    pub evidence_file_names: Vec<String>,
}

impl ProgressSnapshot {
    /// Creates a snapshot with only a percentage set.
    #[must_use]
    pub fn with_percentage(progress_percentage: Decimal) -> Self {
        Self {
            progress_percentage,
            ..Self::default()
        }
    }

    /// Checks the percentage range and the evidence list lengths.
    pub fn validate(&self) -> Result<(), ProgressError> {
        validate_percentage(self.progress_percentage)?;
        if self.evidence_files.len() != self.evidence_file_names.len() {
            return Err(ProgressError::EvidenceMismatch {
                files: self.evidence_files.len(),
                names: self.evidence_file_names.len(),
            });
        }
        Ok(())
    }

    /// Appends one evidence reference, keeping both lists in step.
    pub fn push_evidence(&mut self, url: impl Into<String>, file_name: impl Into<String>) {
        self.evidence_files.push(url.into());
        self.evidence_file_names.push(file_name.into());
    }

    /// Returns true once the product is fully complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress_percentage >= Decimal::ONE_HUNDRED
    }
}

/// Decimal places kept for progress percentages.
pub const PERCENTAGE_SCALE: u32 = 2;

/// Fails unless `value` is within 0..=100 with at most two decimals.
pub fn validate_percentage(value: Decimal) -> Result<(), ProgressError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ProgressError::OutOfRange { value });
    }
    if value.normalize().scale() > PERCENTAGE_SCALE {
        return Err(ProgressError::Malformed(value.to_string()));
    }
    Ok(())
}

/// Parses a raw percentage input such as `"80"` or `" 12.5 "`.
pub fn parse_percentage(raw: &str) -> Result<Decimal, ProgressError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| ProgressError::Malformed(raw.to_string()))?;
    validate_percentage(value)?;
    Ok(value)
}

/// Persisted progress row for one product within one manager report.
///
/// At most one row exists per `(manager_report_id, product_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductProgressReport {
    /// Row id.
    pub id: ProgressReportId,
    /// Owning report.
    pub manager_report_id: ManagerReportId,
    /// Measured product.
    pub product_id: ProductId,
    /// Assignment the product was planned under.
    pub assignment_id: AssignmentId,
    /// Completion percentage, 0..=100.
    pub progress_percentage: Decimal,
    /// Free-text observations.
    pub observations: Option<String>,
    /// Public URLs of uploaded evidence.
    pub evidence_files: Vec<String>,
    /// Original file names, parallel to `evidence_files`.
    pub evidence_file_names: Vec<String>,
}

impl ProductProgressReport {
    /// Builds a row from a snapshot. The id is fresh; the store keeps the
    /// existing one on conflict.
    #[must_use]
    pub fn from_snapshot(
        manager_report_id: ManagerReportId,
        product_id: ProductId,
        assignment_id: AssignmentId,
        snapshot: &ProgressSnapshot,
    ) -> Self {
        Self {
            id: ProgressReportId::new(),
            manager_report_id,
            product_id,
            assignment_id,
            progress_percentage: snapshot.progress_percentage,
            observations: (!snapshot.observations.is_empty())
                .then(|| snapshot.observations.clone()),
            evidence_files: snapshot.evidence_files.clone(),
            evidence_file_names: snapshot.evidence_file_names.clone(),
        }
    }

    /// Returns the snapshot view of this row.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            progress_percentage: self.progress_percentage,
            observations: self.observations.clone().unwrap_or_default(),
            evidence_files: self.evidence_files.clone(),
            evidence_file_names: self.evidence_file_names.clone(),
        }
    }
}

/// Summary shown before and after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Rounded unweighted mean, 0..=100.
    pub overall: u8,
    /// True when `overall` is below the improvement-plan threshold.
    pub requires_improvement_plan: bool,
    /// Number of products counted.
    pub product_count: usize,
    /// Number of products at 100%.
    pub completed_count: usize,
}
