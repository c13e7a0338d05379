//! Assignment domain types.

use gestor_shared::types::{AssignmentId, PlanId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest value an assignment can hold: `NUMERIC(10,2)`, i.e. 99,999,999.99.
pub const MAX_HOURS: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, HOURS_SCALE);

/// Decimal places kept for assigned hours.
pub const HOURS_SCALE: u32 = 2;

/// Hours budgeted to one product within one plan.
///
/// Unique per `(plan_id, product_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment ID.
    pub id: AssignmentId,
    /// Owning plan.
    pub plan_id: PlanId,
    /// Budgeted product.
    pub product_id: ProductId,
    /// Planned effort, never negative.
    pub assigned_hours: Decimal,
}

/// Assigned hours compared against the manager's allocation.
///
/// Advisory only: an over-budget plan can still be saved and submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBudget {
    /// Sum of assigned hours.
    pub assigned: Decimal,
    /// The manager's total allocation, when configured.
    pub allocated: Option<Decimal>,
    /// `allocated - assigned`; negative when over budget.
    pub remaining: Option<Decimal>,
    /// True when assigned hours exceed the allocation.
    pub over_budget: bool,
}

impl HourBudget {
    /// Computes the budget view.
    #[must_use]
    pub fn new(assigned: Decimal, allocated: Option<Decimal>) -> Self {
        Self {
            assigned,
            allocated,
            remaining: allocated.and_then(|total| total.checked_sub(assigned)),
            over_budget: allocated.is_some_and(|total| assigned > total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_budget_without_allocation() {
        let budget = HourBudget::new(dec!(15), None);
        assert_eq!(budget.remaining, None);
        assert!(!budget.over_budget);
    }

    #[test]
    fn test_budget_within_allocation() {
        let budget = HourBudget::new(dec!(15), Some(dec!(20)));
        assert_eq!(budget.remaining, Some(dec!(5)));
        assert!(!budget.over_budget);
    }

    #[test]
    fn test_budget_exactly_at_allocation() {
        let budget = HourBudget::new(dec!(20), Some(dec!(20)));
        assert_eq!(budget.remaining, Some(dec!(0)));
        assert!(!budget.over_budget);
    }

    #[test]
    fn test_max_hours_matches_column() {
        assert_eq!(MAX_HOURS, dec!(99999999.99));
        assert_eq!(MAX_HOURS.scale(), HOURS_SCALE);
    }

    #[test]
    fn test_budget_remaining_unrepresentable() {
        let budget = HourBudget::new(Decimal::MAX, Some(Decimal::MIN));
        assert_eq!(budget.remaining, None);
        assert!(budget.over_budget);
    }

    #[test]
    fn test_budget_over_allocation() {
        let budget = HourBudget::new(dec!(22.5), Some(dec!(20)));
        assert_eq!(budget.remaining, Some(dec!(-2.5)));
        assert!(budget.over_budget);
    }
}
