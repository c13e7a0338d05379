//! Assignment error types.

use gestor_shared::types::ProductId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::lifecycle::PlanStatus;

/// Errors that can occur while allocating hours.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// Hours can only change while the plan is Draft or Rejected.
    #[error("Plan is {status}; assignments are read-only")]
    PlanNotEditable {
        /// The plan's current status.
        status: PlanStatus,
    },

    /// The product is not part of the work-plan taxonomy.
    #[error("Product {product_id} is not available for work plans")]
    ProductNotInScope {
        /// The rejected product.
        product_id: ProductId,
    },

    /// Hours must be zero or more.
    #[error("Assigned hours cannot be negative: {hours}")]
    NegativeHours {
        /// The rejected value.
        hours: Decimal,
    },

    /// Raw hour input is not a number, or has more than two decimals.
    #[error("Malformed hours value: {0:?}")]
    MalformedHours(String),

    /// Hours above the largest storable value.
    #[error("Assigned hours {hours} exceed the maximum of {max}")]
    HoursOutOfRange {
        /// The rejected value.
        hours: Decimal,
        /// The largest accepted value.
        max: Decimal,
    },

    /// The plan's assigned hours do not add up to a representable total.
    #[error("Total assigned hours overflow")]
    TotalOverflow,
}

impl AssignmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PlanNotEditable { .. } => 409,
            Self::ProductNotInScope { .. } => 404,
            Self::NegativeHours { .. }
            | Self::MalformedHours(_)
            | Self::HoursOutOfRange { .. } => 400,
            Self::TotalOverflow => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PlanNotEditable { .. } => "PLAN_NOT_EDITABLE",
            Self::ProductNotInScope { .. } => "PRODUCT_NOT_IN_SCOPE",
            Self::NegativeHours { .. } => "NEGATIVE_HOURS",
            Self::MalformedHours(_) => "MALFORMED_HOURS",
            Self::HoursOutOfRange { .. } => "HOURS_OUT_OF_RANGE",
            Self::TotalOverflow => "TOTAL_HOURS_OVERFLOW",
        }
    }
}
