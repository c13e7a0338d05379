//! The editable assignment set of one plan.

use std::str::FromStr;

use gestor_shared::types::{AssignmentId, PlanId, ProductId};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::assignment::error::AssignmentError;
use crate::assignment::types::{Assignment, HOURS_SCALE, HourBudget, MAX_HOURS};
use crate::hierarchy::Linked;
use crate::plan::Plan;
use crate::taxonomy::{Taxonomy, UsageTag};

/// Hour allocations of an editable plan, keyed by product.
///
/// Only products of the work-plan taxonomy can receive hours. Setting the
/// same product again updates its assignment in place.
#[derive(Debug, Clone)]
pub struct AssignmentBuilder {
    plan_id: PlanId,
    taxonomy: Taxonomy,
    assignments: IndexMap<ProductId, Assignment>,
}

impl AssignmentBuilder {
    /// Opens the builder for a plan.
    ///
    /// `taxonomy` is narrowed to [`UsageTag::WorkPlan`]. `existing` holds the
    /// assignments already stored for the plan.
    pub fn for_plan(
        plan: &Plan,
        taxonomy: &Taxonomy,
        existing: impl IntoIterator<Item = Assignment>,
    ) -> Result<Self, AssignmentError> {
        if !plan.status.is_editable() {
            return Err(AssignmentError::PlanNotEditable {
                status: plan.status,
            });
        }

        Ok(Self::load(plan.id, taxonomy, existing))
    }

    /// Read-only view of a plan's assignments regardless of status.
    pub fn load(
        plan_id: PlanId,
        taxonomy: &Taxonomy,
        existing: impl IntoIterator<Item = Assignment>,
    ) -> Self {
        let assignments = existing
            .into_iter()
            .map(|assignment| (assignment.product_id, assignment))
            .collect();
        Self {
            plan_id,
            taxonomy: taxonomy.scoped(UsageTag::WorkPlan),
            assignments,
        }
    }

    /// Sets the hours for a product and returns the assignment to upsert.
    pub fn set_hours(
        &mut self,
        product_id: ProductId,
        hours: Decimal,
    ) -> Result<Assignment, AssignmentError> {
        validate_hours(hours)?;
        if self.taxonomy.product(product_id).is_none() {
            return Err(AssignmentError::ProductNotInScope { product_id });
        }

        let plan_id = self.plan_id;
        let assignment = self
            .assignments
            .entry(product_id)
            .and_modify(|a| a.assigned_hours = hours)
            .or_insert_with(|| Assignment {
                id: AssignmentId::new(),
                plan_id,
                product_id,
                assigned_hours: hours,
            });
        Ok(assignment.clone())
    }

    /// Assignment for a product, if any.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&Assignment> {
        self.assignments.get(&product_id)
    }

    /// All assignments in insertion order.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values()
    }

    /// Sum of assigned hours.
    ///
    /// Stored rows are summed as read, so an out-of-range row can still
    /// overflow the total.
    pub fn total_hours(&self) -> Result<Decimal, AssignmentError> {
        self.assignments
            .values()
            .try_fold(Decimal::ZERO, |total, a| total.checked_add(a.assigned_hours))
            .ok_or(AssignmentError::TotalOverflow)
    }

    /// Compares assigned hours with the manager's allocation.
    pub fn hour_budget(&self, allocated: Option<Decimal>) -> Result<HourBudget, AssignmentError> {
        Ok(HourBudget::new(self.total_hours()?, allocated))
    }

    /// The work-plan taxonomy hours can be assigned against.
    #[must_use]
    pub fn scope(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Pairs every assignment with its taxonomy joins for the organizer.
    #[must_use]
    pub fn linked(&self) -> Vec<Linked<Assignment>> {
        self.assignments
            .values()
            .map(|a| Linked::new(a.clone(), self.taxonomy.links_for(a.product_id)))
            .collect()
    }
}

/// Parses raw hour input. Blank input means zero hours.
pub fn parse_hours(raw: &str) -> Result<Decimal, AssignmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let hours =
        Decimal::from_str(trimmed).map_err(|_| AssignmentError::MalformedHours(raw.to_string()))?;
    validate_hours(hours)?;
    Ok(hours)
}

/// Checks that `hours` is storable as-is: zero or more, at most
/// [`MAX_HOURS`], and no more than two decimal places.
pub fn validate_hours(hours: Decimal) -> Result<(), AssignmentError> {
    if hours < Decimal::ZERO {
        return Err(AssignmentError::NegativeHours { hours });
    }
    if hours.normalize().scale() > HOURS_SCALE {
        return Err(AssignmentError::MalformedHours(hours.to_string()));
    }
    if hours > MAX_HOURS {
        return Err(AssignmentError::HoursOutOfRange {
            hours,
            max: MAX_HOURS,
        });
    }
    Ok(())
}
