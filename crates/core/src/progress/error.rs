//! Progress validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating progress entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// Percentage outside 0..=100.
    #[error("Progress percentage {value} is outside 0-100")]
    OutOfRange {
        /// The rejected value.
        value: Decimal,
    },

    /// Evidence URLs and names are parallel lists and must match in length.
    #[error("Evidence lists differ in length: {files} files, {names} names")]
    EvidenceMismatch {
        /// Number of evidence URLs.
        files: usize,
        /// Number of evidence file names.
        names: usize,
    },

    /// Raw percentage input could not be parsed.
    #[error("Malformed progress percentage: {0}")]
    Malformed(String),
}

impl ProgressError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "PROGRESS_OUT_OF_RANGE",
            Self::EvidenceMismatch { .. } => "EVIDENCE_MISMATCH",
            Self::Malformed(_) => "MALFORMED_PROGRESS",
        }
    }
}
