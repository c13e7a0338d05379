//! Overall progress and the improvement-plan rule.
//!
//! The mean is unweighted: every product counts once regardless of the
//! hours assigned to it.

use rust_decimal::prelude::*;

use crate::hierarchy::OrganizedTree;
use crate::progress::types::{ProgressSnapshot, ProgressSummary};

/// Overall progress below this value calls for an improvement plan.
pub const IMPROVEMENT_PLAN_THRESHOLD: u8 = 70;

/// Stateless progress calculations.
pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Arithmetic mean of the percentages, rounded to the nearest integer.
    ///
    /// Halves round away from zero. An empty slice yields 0.
    #[must_use]
    pub fn overall_progress(entries: &[ProgressSnapshot]) -> u8 {
        Self::mean_percentage(entries.iter().map(|e| e.progress_percentage))
    }

    /// Same as [`Self::overall_progress`] over raw percentages.
    #[must_use]
    pub fn mean_percentage(values: impl IntoIterator<Item = Decimal>) -> u8 {
        let (sum, count) = values
            .into_iter()
            .fold((Decimal::ZERO, 0u32), |(sum, count), value| {
                (sum + value, count + 1)
            });
        if count == 0 {
            return 0;
        }

        let mean = (sum / Decimal::from(count))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        mean.to_u8().unwrap_or(0)
    }

    /// Plan-level progress: unweighted mean over every leaf of the tree.
    #[must_use]
    pub fn plan_progress<T>(tree: &OrganizedTree<T>) -> u8 {
        Self::mean_percentage(tree.leaves().map(|leaf| leaf.progress.progress_percentage))
    }

    /// True iff `overall` is strictly below [`IMPROVEMENT_PLAN_THRESHOLD`].
    ///
    /// Advisory only; submission is never blocked on it.
    #[must_use]
    pub fn requires_improvement_plan(overall: u8) -> bool {
        overall < IMPROVEMENT_PLAN_THRESHOLD
    }

    /// Builds the display summary for a set of entries.
    #[must_use]
    pub fn summarize(entries: &[ProgressSnapshot]) -> ProgressSummary {
        let overall = Self::overall_progress(entries);
        ProgressSummary {
            overall,
            requires_improvement_plan: Self::requires_improvement_plan(overall),
            product_count: entries.len(),
            completed_count: entries.iter().filter(|e| e.is_complete()).count(),
        }
    }
}
