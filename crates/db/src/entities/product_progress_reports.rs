//! `SeaORM` Entity for product_progress_reports table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "product_progress_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub manager_report_id: Uuid,
    pub product_id: Uuid,
    pub assignment_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub progress_percentage: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub observations: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub evidence_files: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub evidence_file_names: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::manager_reports::Entity",
        from = "Column::ManagerReportId",
        to = "super::manager_reports::Column::Id"
    )]
    ManagerReports,
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignments,
}

impl Related<super::manager_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagerReports.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
