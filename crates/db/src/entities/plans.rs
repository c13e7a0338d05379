//! `SeaORM` Entity for plans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PlanStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_type_id: Uuid,
    pub manager_id: Uuid,
    pub title: String,
    pub status: PlanStatus,
    pub submitted_date: Option<DateTimeWithTimeZone>,
    pub approved_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub approval_comments: Option<String>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_types::Entity",
        from = "Column::PlanTypeId",
        to = "super::plan_types::Column::Id"
    )]
    PlanTypes,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::manager_reports::Entity")]
    ManagerReports,
}

impl Related<super::plan_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanTypes.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::manager_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagerReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
