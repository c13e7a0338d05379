//! `SeaORM` entities.

pub mod actions;
pub mod assignments;
pub mod manager_reports;
pub mod plan_field_responses;
pub mod plan_fields;
pub mod plan_types;
pub mod plans;
pub mod product_progress_reports;
pub mod products;
pub mod sea_orm_active_enums;
pub mod strategic_axes;
