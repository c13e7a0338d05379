//! Report service.
//!
//! Saves are sequential. A batch stops at the first failing product and
//! reports it; rows written before the failure stay written.

use std::sync::Arc;

use gestor_shared::types::{ManagerReportId, PlanId, ProductId, ReportPeriodId};
use indexmap::IndexMap;

use crate::assignment::Assignment;
use crate::context::ActorContext;
use crate::hierarchy::organize;
use crate::lifecycle::{LifecycleError, PlanStatus, ReportLifecycle, ReportTransition};
use crate::plan::Plan;
use crate::ports::{EvidenceStore, PlanStore, ReportStore};
use crate::progress::{ProductProgressReport, ProgressBook, ProgressSnapshot};
use crate::report::error::ReportError;
use crate::report::types::{ManagerReport, ReportStatusUpdate, ReportSubmission, ReportView};
use crate::storage::{EvidenceFile, EvidenceRef, StorageService};

/// Report operations over a store and an evidence bucket.
pub struct ReportService<S, E> {
    store: Arc<S>,
    evidence: Arc<E>,
}

impl<S, E> ReportService<S, E>
where
    S: PlanStore + ReportStore,
    E: EvidenceStore,
{
    /// Create a new report service.
    #[must_use]
    pub fn new(store: Arc<S>, evidence: Arc<E>) -> Self {
        Self { store, evidence }
    }

    /// Plans the actor may open a report against. Only approved plans.
    pub async fn report_candidates(&self, ctx: &ActorContext) -> Result<Vec<Plan>, ReportError> {
        let plans = self.store.list_approved_plans(ctx.user_id).await?;
        Ok(plans
            .into_iter()
            .filter(|plan| plan.status == PlanStatus::Approved)
            .collect())
    }

    /// The actor's report for a plan and period, created if missing.
    pub async fn open_report(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
        report_period_id: ReportPeriodId,
        title: &str,
    ) -> Result<ManagerReport, ReportError> {
        let plan = self.store.fetch_plan(plan_id).await?;
        ctx.ensure_owner(plan.manager_id)?;
        if plan.status != PlanStatus::Approved {
            return Err(LifecycleError::PlanNotApproved {
                status: plan.status,
            }
            .into());
        }

        if let Some(existing) = self
            .store
            .find_report(ctx.user_id, plan_id, report_period_id)
            .await?
        {
            return Ok(existing);
        }

        let report = self
            .store
            .create_report(&ManagerReport::new_draft(
                ctx.user_id,
                plan_id,
                report_period_id,
                title.trim(),
            ))
            .await?;

        tracing::info!(
            report_id = %report.id,
            plan_id = %plan_id,
            period_id = %report_period_id,
            "Created manager report"
        );
        Ok(report)
    }

    /// Load a report with its progress book and organized tree.
    ///
    /// The owner and reviewers may load a report.
    pub async fn load(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
    ) -> Result<ReportView, ReportError> {
        let report = self.store.fetch_report(report_id).await?;
        if !ctx.role.is_reviewer() {
            ctx.ensure_owner(report.manager_id)?;
        }

        let (rows, assignments) = futures::try_join!(
            self.store.fetch_progress_reports(report_id),
            self.store.fetch_assignments(report.plan_id),
        )?;
        let book = ProgressBook::from_reports(report.id, rows);
        let tree = organize(&assignments, |product_id| book.progress_for(product_id));
        let summary = book.summary_for(assignments.iter().map(|a| a.item.product_id));

        Ok(ReportView {
            report,
            book,
            tree,
            summary,
        })
    }

    /// Auto-save of a single product edit.
    pub async fn record_progress(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
        book: &mut ProgressBook,
        product_id: ProductId,
        snapshot: ProgressSnapshot,
    ) -> Result<ProductProgressReport, ReportError> {
        ensure_book(report_id, book)?;
        let report = self.editable_report(ctx, report_id).await?;
        let assignments = self.assignments_by_product(report.plan_id).await?;
        let assignment = assignment_for(&assignments, product_id)?;

        book.edit(product_id, snapshot)?;
        self.save_item(report.id, assignment, book).await
    }

    /// Upload an evidence file and attach it to a product.
    ///
    /// Nothing is saved when the upload fails.
    pub async fn attach_evidence(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
        book: &mut ProgressBook,
        product_id: ProductId,
        file: &EvidenceFile,
    ) -> Result<EvidenceRef, ReportError> {
        ensure_book(report_id, book)?;
        let report = self.editable_report(ctx, report_id).await?;
        let assignments = self.assignments_by_product(report.plan_id).await?;
        let assignment = assignment_for(&assignments, product_id)?;

        let path = StorageService::evidence_path(report.id, product_id, &file.file_name);
        let uploaded = self
            .evidence
            .upload_evidence_file(file, self.evidence.evidence_bucket(), &path)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    report_id = %report.id,
                    product_id = %product_id,
                    file_name = %file.file_name,
                    error = %e,
                    "Evidence upload failed"
                );
            })?;

        book.push_evidence(product_id, &uploaded.public_url, &uploaded.file_name);
        self.save_item(report.id, assignment, book).await?;
        Ok(uploaded)
    }

    /// Save every pending edit of the book.
    ///
    /// Returns the number of rows written.
    pub async fn save_draft(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
        book: &mut ProgressBook,
    ) -> Result<usize, ReportError> {
        ensure_book(report_id, book)?;
        let report = self.editable_report(ctx, report_id).await?;
        let assignments = self.assignments_by_product(report.plan_id).await?;
        self.save_pending(&report, &assignments, book).await
    }

    /// Save pending edits, recompute the total and submit the report.
    ///
    /// Nothing is written unless the plan is still approved. The status
    /// change is not attempted when any save fails. Low overall progress
    /// never blocks submission.
    pub async fn submit(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
        book: &mut ProgressBook,
    ) -> Result<ReportSubmission, ReportError> {
        ensure_book(report_id, book)?;
        let report = self.editable_report(ctx, report_id).await?;
        let plan = self.store.fetch_plan(report.plan_id).await?;
        if plan.status != PlanStatus::Approved {
            return Err(LifecycleError::PlanNotApproved {
                status: plan.status,
            }
            .into());
        }
        let assignments = self.assignments_by_product(report.plan_id).await?;

        self.save_pending(&report, &assignments, book).await?;

        let summary = book.summary_for(assignments.keys().copied());
        let transition =
            ReportLifecycle::submit(report.status, plan.status, ctx.user_id, summary.overall)?;
        let updated = self.write_transition(&report, &transition).await?;

        tracing::info!(
            report_id = %report.id,
            overall = summary.overall,
            requires_improvement_plan = summary.requires_improvement_plan,
            "Report submitted"
        );
        Ok(ReportSubmission {
            report: updated,
            summary,
        })
    }

    /// Mark a submitted report as reviewed. Coordinator or administrator only.
    pub async fn review(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
    ) -> Result<ManagerReport, ReportError> {
        let report = self.store.fetch_report(report_id).await?;
        let transition = ReportLifecycle::review(report.status, ctx)?;
        self.write_transition(&report, &transition).await
    }

    async fn editable_report(
        &self,
        ctx: &ActorContext,
        report_id: ManagerReportId,
    ) -> Result<ManagerReport, ReportError> {
        let report = self.store.fetch_report(report_id).await?;
        ctx.ensure_owner(report.manager_id)?;
        ReportLifecycle::ensure_editable(report.status)?;
        Ok(report)
    }

    async fn assignments_by_product(
        &self,
        plan_id: PlanId,
    ) -> Result<IndexMap<ProductId, Assignment>, ReportError> {
        let mut by_product = IndexMap::new();
        for linked in self.store.fetch_assignments(plan_id).await? {
            by_product
                .entry(linked.item.product_id)
                .or_insert(linked.item);
        }
        Ok(by_product)
    }

    async fn save_pending(
        &self,
        report: &ManagerReport,
        assignments: &IndexMap<ProductId, Assignment>,
        book: &mut ProgressBook,
    ) -> Result<usize, ReportError> {
        let pending: Vec<&Assignment> = book
            .pending_edits()
            .map(|(product_id, _)| assignment_for(assignments, product_id))
            .collect::<Result<_, _>>()?;

        let mut saved = 0;
        for assignment in pending {
            self.save_item(report.id, assignment, book).await?;
            saved += 1;
        }

        tracing::debug!(report_id = %report.id, saved, "Saved progress batch");
        Ok(saved)
    }

    async fn save_item(
        &self,
        report_id: ManagerReportId,
        assignment: &Assignment,
        book: &mut ProgressBook,
    ) -> Result<ProductProgressReport, ReportError> {
        let product_id = assignment.product_id;
        let row = ProductProgressReport::from_snapshot(
            report_id,
            product_id,
            assignment.id,
            &book.progress_for(product_id),
        );

        match self.store.upsert_progress_report(&row).await {
            Ok(saved) => {
                book.mark_saved(saved.clone());
                Ok(saved)
            }
            Err(source) => {
                tracing::warn!(
                    report_id = %report_id,
                    product_id = %product_id,
                    error = %source,
                    "Progress save failed"
                );
                Err(ReportError::ItemSaveFailed { product_id, source })
            }
        }
    }

    async fn write_transition(
        &self,
        report: &ManagerReport,
        transition: &ReportTransition,
    ) -> Result<ManagerReport, ReportError> {
        let update = ReportStatusUpdate::from(transition);
        let updated = self.store.update_report_status(report.id, &update).await?;

        tracing::info!(
            report_id = %report.id,
            from = %report.status,
            to = %updated.status,
            "Report status changed"
        );
        Ok(updated)
    }
}

fn ensure_book(report_id: ManagerReportId, book: &ProgressBook) -> Result<(), ReportError> {
    if book.report_id() == report_id {
        Ok(())
    } else {
        Err(ReportError::BookMismatch {
            expected: report_id,
            found: book.report_id(),
        })
    }
}

fn assignment_for(
    assignments: &IndexMap<ProductId, Assignment>,
    product_id: ProductId,
) -> Result<&Assignment, ReportError> {
    assignments
        .get(&product_id)
        .ok_or(ReportError::ProductNotAssigned { product_id })
}
