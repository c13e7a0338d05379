//! `SeaORM` Entity for manager_reports table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ReportStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "manager_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub manager_id: Uuid,
    pub plan_id: Uuid,
    pub report_period_id: Uuid,
    pub title: String,
    pub status: ReportStatus,
    pub submitted_date: Option<DateTimeWithTimeZone>,
    pub total_progress_percentage: Option<i16>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plans::Entity",
        from = "Column::PlanId",
        to = "super::plans::Column::Id"
    )]
    Plans,
    #[sea_orm(has_many = "super::product_progress_reports::Entity")]
    ProductProgressReports,
}

impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plans.def()
    }
}

impl Related<super::product_progress_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductProgressReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
