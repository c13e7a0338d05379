//! `SeaORM` Entity for plan_fields table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_type_id: Uuid,
    pub field_name: String,
    pub field_type: String,
    pub is_required: bool,
    pub field_order: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub dropdown_options: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_types::Entity",
        from = "Column::PlanTypeId",
        to = "super::plan_types::Column::Id"
    )]
    PlanTypes,
}

impl Related<super::plan_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
