//! Report repository: manager reports and per-product progress rows.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use gestor_core::lifecycle;
use gestor_core::ports::{ReportStore, StoreError};
use gestor_core::progress::ProductProgressReport;
use gestor_core::report::{ManagerReport, ReportStatusUpdate};
use gestor_shared::types::{
    AssignmentId, ManagerReportId, PlanId, ProductId, ProgressReportId, ReportPeriodId, UserId,
};

use super::{DbStore, json_strings, store_err, strings_json, to_utc};
use crate::entities::{
    manager_reports, product_progress_reports, sea_orm_active_enums::ReportStatus,
};

impl ReportStore for DbStore {
    async fn find_report(
        &self,
        manager_id: UserId,
        plan_id: PlanId,
        report_period_id: ReportPeriodId,
    ) -> Result<Option<ManagerReport>, StoreError> {
        manager_reports::Entity::find()
            .filter(manager_reports::Column::ManagerId.eq(manager_id.into_inner()))
            .filter(manager_reports::Column::PlanId.eq(plan_id.into_inner()))
            .filter(manager_reports::Column::ReportPeriodId.eq(report_period_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(report_from_model)
            .transpose()
    }

    async fn create_report(&self, report: &ManagerReport) -> Result<ManagerReport, StoreError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let active = manager_reports::ActiveModel {
            id: Set(report.id.into_inner()),
            manager_id: Set(report.manager_id.into_inner()),
            plan_id: Set(report.plan_id.into_inner()),
            report_period_id: Set(report.report_period_id.into_inner()),
            title: Set(report.title.clone()),
            status: Set(report_status_to_db(report.status)),
            submitted_date: Set(report.submitted_date.map(Into::into)),
            total_progress_percentage: Set(report.total_progress_percentage.map(i16::from)),
            reviewed_by: Set(report.reviewed_by.map(UserId::into_inner)),
            reviewed_date: Set(report.reviewed_date.map(Into::into)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await.map_err(store_err)?;
        report_from_model(model)
    }

    async fn fetch_report(&self, report_id: ManagerReportId) -> Result<ManagerReport, StoreError> {
        let model = manager_reports::Entity::find_by_id(report_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::not_found("report", report_id))?;
        report_from_model(model)
    }

    async fn fetch_progress_reports(
        &self,
        report_id: ManagerReportId,
    ) -> Result<Vec<ProductProgressReport>, StoreError> {
        product_progress_reports::Entity::find()
            .filter(product_progress_reports::Column::ManagerReportId.eq(report_id.into_inner()))
            .order_by_asc(product_progress_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(progress_from_model)
            .collect()
    }

    async fn upsert_progress_report(
        &self,
        report: &ProductProgressReport,
    ) -> Result<ProductProgressReport, StoreError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let active = product_progress_reports::ActiveModel {
            id: Set(report.id.into_inner()),
            manager_report_id: Set(report.manager_report_id.into_inner()),
            product_id: Set(report.product_id.into_inner()),
            assignment_id: Set(report.assignment_id.into_inner()),
            progress_percentage: Set(report.progress_percentage),
            observations: Set(report.observations.clone()),
            evidence_files: Set(strings_json(&report.evidence_files)),
            evidence_file_names: Set(strings_json(&report.evidence_file_names)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = product_progress_reports::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([
                    product_progress_reports::Column::ManagerReportId,
                    product_progress_reports::Column::ProductId,
                ])
                .update_columns([
                    product_progress_reports::Column::AssignmentId,
                    product_progress_reports::Column::ProgressPercentage,
                    product_progress_reports::Column::Observations,
                    product_progress_reports::Column::EvidenceFiles,
                    product_progress_reports::Column::EvidenceFileNames,
                    product_progress_reports::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(store_err)?;

        tracing::debug!(
            report_id = %report.manager_report_id,
            product_id = %report.product_id,
            "Upserted progress row"
        );
        progress_from_model(model)
    }

    async fn update_report_status(
        &self,
        report_id: ManagerReportId,
        update: &ReportStatusUpdate,
    ) -> Result<ManagerReport, StoreError> {
        let model = manager_reports::Entity::find_by_id(report_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::not_found("report", report_id))?;

        let mut active: manager_reports::ActiveModel = model.into();
        active.status = Set(report_status_to_db(update.status));
        if let Some(submitted) = update.submitted_date {
            active.submitted_date = Set(Some(submitted.into()));
        }
        if let Some(total) = update.total_progress_percentage {
            active.total_progress_percentage = Set(Some(i16::from(total)));
        }
        if let Some(review) = &update.review {
            active.reviewed_by = Set(Some(review.reviewed_by.into_inner()));
            active.reviewed_date = Set(Some(review.reviewed_date.into()));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(store_err)?;
        report_from_model(updated)
    }
}

fn report_status_to_core(status: ReportStatus) -> lifecycle::ReportStatus {
    match status {
        ReportStatus::Draft => lifecycle::ReportStatus::Draft,
        ReportStatus::Submitted => lifecycle::ReportStatus::Submitted,
        ReportStatus::Reviewed => lifecycle::ReportStatus::Reviewed,
    }
}

fn report_status_to_db(status: lifecycle::ReportStatus) -> ReportStatus {
    match status {
        lifecycle::ReportStatus::Draft => ReportStatus::Draft,
        lifecycle::ReportStatus::Submitted => ReportStatus::Submitted,
        lifecycle::ReportStatus::Reviewed => ReportStatus::Reviewed,
    }
}

fn report_from_model(model: manager_reports::Model) -> Result<ManagerReport, StoreError> {
    let total_progress_percentage = model
        .total_progress_percentage
        .map(|total| {
            u8::try_from(total)
                .ok()
                .filter(|value| *value <= 100)
                .ok_or_else(|| {
                    StoreError::Backend(format!(
                        "report {} has total progress {total} outside 0..=100",
                        model.id
                    ))
                })
        })
        .transpose()?;

    Ok(ManagerReport {
        id: ManagerReportId::from_uuid(model.id),
        manager_id: UserId::from_uuid(model.manager_id),
        plan_id: PlanId::from_uuid(model.plan_id),
        report_period_id: ReportPeriodId::from_uuid(model.report_period_id),
        title: model.title,
        status: report_status_to_core(model.status),
        submitted_date: model.submitted_date.map(to_utc),
        total_progress_percentage,
        reviewed_by: model.reviewed_by.map(UserId::from_uuid),
        reviewed_date: model.reviewed_date.map(to_utc),
    })
}

fn progress_from_model(
    model: product_progress_reports::Model,
) -> Result<ProductProgressReport, StoreError> {
    Ok(ProductProgressReport {
        id: ProgressReportId::from_uuid(model.id),
        manager_report_id: ManagerReportId::from_uuid(model.manager_report_id),
        product_id: ProductId::from_uuid(model.product_id),
        assignment_id: AssignmentId::from_uuid(model.assignment_id),
        progress_percentage: model.progress_percentage,
        observations: model.observations,
        evidence_files: json_strings(&model.evidence_files, "evidence_files")?,
        evidence_file_names: json_strings(&model.evidence_file_names, "evidence_file_names")?,
    })
}
