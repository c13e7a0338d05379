//! `SeaORM` Entity for actions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "actions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub strategic_axis_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub usage_tags: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::strategic_axes::Entity",
        from = "Column::StrategicAxisId",
        to = "super::strategic_axes::Column::Id"
    )]
    StrategicAxes,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::strategic_axes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StrategicAxes.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
