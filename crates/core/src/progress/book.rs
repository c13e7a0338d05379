//! Persisted progress rows merged with unsaved local edits.

use gestor_shared::types::{ManagerReportId, ProductId};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::progress::aggregator::ProgressAggregator;
use crate::progress::error::ProgressError;
use crate::progress::types::{ProductProgressReport, ProgressSnapshot, ProgressSummary};

/// Progress state of one manager report.
///
/// Entries are keyed by product id. A local edit always takes precedence
/// over the persisted row for the same product. A book is bound to the
/// report it was created for.
#[derive(Debug, Clone)]
pub struct ProgressBook {
    report_id: ManagerReportId,
    persisted: IndexMap<ProductId, ProductProgressReport>,
    edits: IndexMap<ProductId, ProgressSnapshot>,
}

impl ProgressBook {
    /// Creates an empty book for a report.
    #[must_use]
    pub fn new(report_id: ManagerReportId) -> Self {
        Self {
            report_id,
            persisted: IndexMap::new(),
            edits: IndexMap::new(),
        }
    }

    /// Creates a book from the rows already stored for a report.
    ///
    /// If the store returns two rows for one product the later one wins.
    /// Rows owned by another report are skipped.
    #[must_use]
    pub fn from_reports(
        report_id: ManagerReportId,
        reports: impl IntoIterator<Item = ProductProgressReport>,
    ) -> Self {
        let persisted = reports
            .into_iter()
            .filter(|report| report.manager_report_id == report_id)
            .map(|report| (report.product_id, report))
            .collect();
        Self {
            report_id,
            persisted,
            edits: IndexMap::new(),
        }
    }

    /// Report this book belongs to.
    #[must_use]
    pub fn report_id(&self) -> ManagerReportId {
        self.report_id
    }

    /// Current progress for a product, or the empty snapshot.
    #[must_use]
    pub fn progress_for(&self, product_id: ProductId) -> ProgressSnapshot {
        if let Some(edit) = self.edits.get(&product_id) {
            return edit.clone();
        }
        self.persisted
            .get(&product_id)
            .map(ProductProgressReport::snapshot)
            .unwrap_or_default()
    }

    /// The stored row for a product, if any.
    #[must_use]
    pub fn persisted(&self, product_id: ProductId) -> Option<&ProductProgressReport> {
        self.persisted.get(&product_id)
    }

    /// Replaces the local snapshot for a product.
    pub fn edit(
        &mut self,
        product_id: ProductId,
        snapshot: ProgressSnapshot,
    ) -> Result<(), ProgressError> {
        snapshot.validate()?;
        self.edits.insert(product_id, snapshot);
        Ok(())
    }

    /// Changes only the percentage of a product.
    pub fn set_percentage(
        &mut self,
        product_id: ProductId,
        progress_percentage: Decimal,
    ) -> Result<(), ProgressError> {
        let mut snapshot = self.progress_for(product_id);
        snapshot.progress_percentage = progress_percentage;
        self.edit(product_id, snapshot)
    }

    /// Changes only the observations of a product.
    pub fn set_observations(&mut self, product_id: ProductId, observations: impl Into<String>) {
        let mut snapshot = self.progress_for(product_id);
        snapshot.observations = observations.into();
        self.edits.insert(product_id, snapshot);
    }

    /// Appends an uploaded evidence file to a product.
    pub fn push_evidence(
        &mut self,
        product_id: ProductId,
        url: impl Into<String>,
        file_name: impl Into<String>,
    ) {
        let mut snapshot = self.progress_for(product_id);
        snapshot.push_evidence(url, file_name);
        self.edits.insert(product_id, snapshot);
    }

    /// Unsaved edits in the order they were first made.
    pub fn pending_edits(&self) -> impl Iterator<Item = (ProductId, &ProgressSnapshot)> {
        self.edits.iter().map(|(id, snapshot)| (*id, snapshot))
    }

    /// Returns true if there are unsaved edits.
    #[must_use]
    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Records a successful save: the stored row replaces the local edit.
    pub fn mark_saved(&mut self, report: ProductProgressReport) {
        self.edits.shift_remove(&report.product_id);
        self.persisted.insert(report.product_id, report);
    }

    /// All entries that exist, deduplicated by product.
    ///
    /// Persisted products come first in load order, followed by products
    /// that only have local edits.
    #[must_use]
    pub fn entries(&self) -> Vec<(ProductId, ProgressSnapshot)> {
        self.product_ids()
            .map(|id| (id, self.progress_for(id)))
            .collect()
    }

    /// Overall progress of the existing entries.
    #[must_use]
    pub fn overall(&self) -> u8 {
        ProgressAggregator::overall_progress(&self.snapshots(self.product_ids()))
    }

    /// Overall progress over the existing entries plus `assigned` products.
    ///
    /// Assigned products without an entry count as 0%.
    #[must_use]
    pub fn overall_for(&self, assigned: impl IntoIterator<Item = ProductId>) -> u8 {
        self.summary_for(assigned).overall
    }

    /// Summary over the existing entries plus `assigned` products.
    #[must_use]
    pub fn summary_for(&self, assigned: impl IntoIterator<Item = ProductId>) -> ProgressSummary {
        let mut ids: IndexMap<ProductId, ()> = self.product_ids().map(|id| (id, ())).collect();
        ids.extend(assigned.into_iter().map(|id| (id, ())));
        ProgressAggregator::summarize(&self.snapshots(ids.into_keys()))
    }

    fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.persisted.keys().copied().chain(
            self.edits
                .keys()
                .copied()
                .filter(|id| !self.persisted.contains_key(id)),
        )
    }

    fn snapshots(&self, ids: impl Iterator<Item = ProductId>) -> Vec<ProgressSnapshot> {
        ids.map(|id| self.progress_for(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestor_shared::types::AssignmentId;
    use rust_decimal_macros::dec;

    fn row(report: ManagerReportId, product: ProductId, pct: Decimal) -> ProductProgressReport {
        ProductProgressReport::from_snapshot(
            report,
            product,
            AssignmentId::new(),
            &ProgressSnapshot::with_percentage(pct),
        )
    }

    #[test]
    fn test_unknown_product_defaults_to_empty() {
        let book = ProgressBook::new(ManagerReportId::new());
        assert_eq!(book.progress_for(ProductId::new()), ProgressSnapshot::default());
        assert_eq!(book.overall(), 0);
    }

    #[test]
    fn test_edit_takes_precedence_over_persisted() {
        let report = ManagerReportId::new();
        let product = ProductId::new();
        let mut book = ProgressBook::from_reports(report, [row(report, product, dec!(20))]);

        book.set_percentage(product, dec!(90)).unwrap();

        assert_eq!(book.progress_for(product).progress_percentage, dec!(90));
        assert_eq!(book.entries().len(), 1);
        assert_eq!(book.overall(), 90);
    }

    #[test]
    fn test_set_percentage_keeps_other_fields() {
        let product = ProductId::new();
        let mut book = ProgressBook::new(ManagerReportId::new());
        book.set_observations(product, "Workshop held");
        book.push_evidence(product, "https://cdn/list.pdf", "list.pdf");
        book.set_percentage(product, dec!(50)).unwrap();

        let snapshot = book.progress_for(product);
        assert_eq!(snapshot.observations, "Workshop held");
        assert_eq!(snapshot.evidence_file_names, vec!["list.pdf"]);
    }

    #[test]
    fn test_invalid_edit_is_rejected_and_not_stored() {
        let product = ProductId::new();
        let mut book = ProgressBook::new(ManagerReportId::new());
        assert!(book.set_percentage(product, dec!(101)).is_err());
        assert!(!book.has_pending_edits());
    }

    #[test]
    fn test_mark_saved_clears_edit() {
        let report = ManagerReportId::new();
        let product = ProductId::new();
        let mut book = ProgressBook::new(report);
        book.set_percentage(product, dec!(30)).unwrap();
        assert!(book.has_pending_edits());

        book.mark_saved(row(report, product, dec!(30)));

        assert!(!book.has_pending_edits());
        assert!(book.persisted(product).is_some());
        assert_eq!(book.progress_for(product).progress_percentage, dec!(30));
    }

    #[test]
    fn test_overall_for_counts_unset_assignments_as_zero() {
        let product_a = ProductId::new();
        let product_b = ProductId::new();
        let mut book = ProgressBook::new(ManagerReportId::new());
        book.set_percentage(product_a, dec!(80)).unwrap();

        assert_eq!(book.overall(), 80);
        assert_eq!(book.overall_for([product_a, product_b]), 40);

        let summary = book.summary_for([product_a, product_b]);
        assert!(summary.requires_improvement_plan);
        assert_eq!(summary.product_count, 2);
    }

    #[test]
    fn test_duplicate_rows_collapse_to_one_entry() {
        let report = ManagerReportId::new();
        let product = ProductId::new();
        let book = ProgressBook::from_reports(report, [
            row(report, product, dec!(10)),
            row(report, product, dec!(60)),
        ]);
        assert_eq!(book.entries().len(), 1);
        assert_eq!(book.progress_for(product).progress_percentage, dec!(60));
    }

    #[test]
    fn test_rows_of_other_reports_are_skipped() {
        let report = ManagerReportId::new();
        let other = ManagerReportId::new();
        let product = ProductId::new();
        let book = ProgressBook::from_reports(
            report,
            [row(report, product, dec!(25)), row(other, ProductId::new(), dec!(90))],
        );

        assert_eq!(book.report_id(), report);
        assert_eq!(book.entries().len(), 1);
        assert_eq!(book.overall(), 25);
    }
}
