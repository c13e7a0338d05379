//! Plan repository: plan types, fields, plans, responses and assignments.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use gestor_core::assignment::Assignment;
use gestor_core::fields::{FieldResponses, FieldValue, StoredPlanField};
use gestor_core::hierarchy::Linked;
use gestor_core::lifecycle;
use gestor_core::plan::{Plan, PlanStatusUpdate, PlanType};
use gestor_core::ports::{PlanStore, StoreError};
use gestor_shared::types::{AssignmentId, PlanFieldId, PlanId, PlanTypeId, ProductId, UserId};

use super::{DbStore, json_strings, store_err, to_utc};
use crate::entities::{
    assignments, plan_field_responses, plan_fields, plan_types, plans,
    sea_orm_active_enums::PlanStatus,
};

impl PlanStore for DbStore {
    async fn fetch_plan_type(&self, plan_type_id: PlanTypeId) -> Result<PlanType, StoreError> {
        plan_types::Entity::find_by_id(plan_type_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(plan_type_from_model)
            .ok_or_else(|| StoreError::not_found("plan type", plan_type_id))
    }

    async fn fetch_plan_fields(
        &self,
        plan_type_id: PlanTypeId,
    ) -> Result<Vec<StoredPlanField>, StoreError> {
        plan_fields::Entity::find()
            .filter(plan_fields::Column::PlanTypeId.eq(plan_type_id.into_inner()))
            .order_by_asc(plan_fields::Column::FieldOrder)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(field_from_model)
            .collect()
    }

    async fn fetch_plan(&self, plan_id: PlanId) -> Result<Plan, StoreError> {
        plans::Entity::find_by_id(plan_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(plan_from_model)
            .ok_or_else(|| StoreError::not_found("plan", plan_id))
    }

    async fn create_plan(&self, plan: &Plan) -> Result<Plan, StoreError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let active = plans::ActiveModel {
            id: Set(plan.id.into_inner()),
            plan_type_id: Set(plan.plan_type_id.into_inner()),
            manager_id: Set(plan.manager_id.into_inner()),
            title: Set(plan.title.clone()),
            status: Set(plan_status_to_db(plan.status)),
            submitted_date: Set(plan.submitted_date.map(Into::into)),
            approved_date: Set(plan.approved_date.map(Into::into)),
            approval_comments: Set(plan.approval_comments.clone()),
            approved_by: Set(plan.approved_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await.map_err(store_err)?;
        Ok(plan_from_model(model))
    }

    async fn update_plan_status(
        &self,
        plan_id: PlanId,
        update: &PlanStatusUpdate,
    ) -> Result<Plan, StoreError> {
        let model = plans::Entity::find_by_id(plan_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::not_found("plan", plan_id))?;

        let mut active: plans::ActiveModel = model.into();
        active.status = Set(plan_status_to_db(update.status));
        if let Some(submitted) = update.submitted_date {
            active.submitted_date = Set(Some(submitted.into()));
        }
        if let Some(review) = &update.review {
            active.approved_by = Set(Some(review.reviewed_by.into_inner()));
            active.approved_date = Set(review.approved_date.map(Into::into));
            active.approval_comments = Set(review.comments.clone());
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(store_err)?;
        Ok(plan_from_model(updated))
    }

    async fn fetch_assignments(
        &self,
        plan_id: PlanId,
    ) -> Result<Vec<Linked<Assignment>>, StoreError> {
        let rows = assignments::Entity::find()
            .filter(assignments::Column::PlanId.eq(plan_id.into_inner()))
            .order_by_asc(assignments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let taxonomy = self.load_taxonomy().await?;
        Ok(rows
            .into_iter()
            .map(|model| {
                let assignment = assignment_from_model(model);
                let links = taxonomy.links_for(assignment.product_id);
                Linked::new(assignment, links)
            })
            .collect())
    }

    async fn upsert_assignment(&self, assignment: &Assignment) -> Result<Assignment, StoreError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let active = assignments::ActiveModel {
            id: Set(assignment.id.into_inner()),
            plan_id: Set(assignment.plan_id.into_inner()),
            product_id: Set(assignment.product_id.into_inner()),
            assigned_hours: Set(assignment.assigned_hours),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = assignments::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([assignments::Column::PlanId, assignments::Column::ProductId])
                    .update_columns([
                        assignments::Column::AssignedHours,
                        assignments::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(store_err)?;
        Ok(assignment_from_model(model))
    }

    async fn save_field_responses(
        &self,
        plan_id: PlanId,
        responses: &FieldResponses,
    ) -> Result<(), StoreError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let rows = responses
            .iter()
            .map(|(field_id, value)| {
                let json = serde_json::to_value(value)
                    .map_err(|e| StoreError::Backend(format!("unserializable response: {e}")))?;
                Ok(plan_field_responses::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    plan_id: Set(plan_id.into_inner()),
                    plan_field_id: Set(field_id.into_inner()),
                    value: Set(json),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let txn = self.db.begin().await.map_err(store_err)?;
        plan_field_responses::Entity::delete_many()
            .filter(plan_field_responses::Column::PlanId.eq(plan_id.into_inner()))
            .exec(&txn)
            .await
            .map_err(store_err)?;
        if !rows.is_empty() {
            plan_field_responses::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(store_err)?;
        }
        txn.commit().await.map_err(store_err)?;

        tracing::debug!(plan_id = %plan_id, count = responses.len(), "Saved field responses");
        Ok(())
    }

    async fn fetch_field_responses(&self, plan_id: PlanId) -> Result<FieldResponses, StoreError> {
        plan_field_responses::Entity::find()
            .filter(plan_field_responses::Column::PlanId.eq(plan_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|model| {
                let value: FieldValue = serde_json::from_value(model.value).map_err(|e| {
                    StoreError::Backend(format!("malformed response {}: {e}", model.id))
                })?;
                Ok((PlanFieldId::from_uuid(model.plan_field_id), value))
            })
            .collect()
    }

    async fn list_approved_plans(&self, manager_id: UserId) -> Result<Vec<Plan>, StoreError> {
        Ok(plans::Entity::find()
            .filter(plans::Column::ManagerId.eq(manager_id.into_inner()))
            .filter(plans::Column::Status.eq(PlanStatus::Approved))
            .order_by_desc(plans::Column::ApprovedDate)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(plan_from_model)
            .collect())
    }
}

/// Converts the database plan status to the core status.
pub(crate) fn plan_status_to_core(status: PlanStatus) -> lifecycle::PlanStatus {
    match status {
        PlanStatus::Draft => lifecycle::PlanStatus::Draft,
        PlanStatus::Submitted => lifecycle::PlanStatus::Submitted,
        PlanStatus::Approved => lifecycle::PlanStatus::Approved,
        PlanStatus::Rejected => lifecycle::PlanStatus::Rejected,
    }
}

/// Converts the core plan status to the database status.
pub(crate) fn plan_status_to_db(status: lifecycle::PlanStatus) -> PlanStatus {
    match status {
        lifecycle::PlanStatus::Draft => PlanStatus::Draft,
        lifecycle::PlanStatus::Submitted => PlanStatus::Submitted,
        lifecycle::PlanStatus::Approved => PlanStatus::Approved,
        lifecycle::PlanStatus::Rejected => PlanStatus::Rejected,
    }
}

fn plan_type_from_model(model: plan_types::Model) -> PlanType {
    PlanType {
        id: PlanTypeId::from_uuid(model.id),
        name: model.name,
        uses_structured_elements: model.uses_structured_elements,
        description: model.description,
    }
}

fn field_from_model(model: plan_fields::Model) -> Result<StoredPlanField, StoreError> {
    let dropdown_options = match &model.dropdown_options {
        Some(options) => json_strings(options, "dropdown_options")?,
        None => Vec::new(),
    };
    Ok(StoredPlanField {
        id: PlanFieldId::from_uuid(model.id),
        plan_type_id: PlanTypeId::from_uuid(model.plan_type_id),
        field_name: model.field_name,
        field_type: model.field_type,
        is_required: model.is_required,
        order: model.field_order,
        dropdown_options,
    })
}

pub(crate) fn plan_from_model(model: plans::Model) -> Plan {
    Plan {
        id: PlanId::from_uuid(model.id),
        plan_type_id: PlanTypeId::from_uuid(model.plan_type_id),
        manager_id: UserId::from_uuid(model.manager_id),
        title: model.title,
        status: plan_status_to_core(model.status),
        submitted_date: model.submitted_date.map(to_utc),
        approved_date: model.approved_date.map(to_utc),
        approval_comments: model.approval_comments,
        approved_by: model.approved_by.map(UserId::from_uuid),
    }
}

fn assignment_from_model(model: assignments::Model) -> Assignment {
    Assignment {
        id: AssignmentId::from_uuid(model.id),
        plan_id: PlanId::from_uuid(model.plan_id),
        product_id: ProductId::from_uuid(model.product_id),
        assigned_hours: model.assigned_hours,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::plan;
    use super::*;
    use gestor_core::context::{ActorContext, UserRole};
    use gestor_core::lifecycle::PlanLifecycle;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    #[test]
    fn test_plan_status_mapping_is_bijective() {
        for status in [
            lifecycle::PlanStatus::Draft,
            lifecycle::PlanStatus::Submitted,
            lifecycle::PlanStatus::Approved,
            lifecycle::PlanStatus::Rejected,
        ] {
            assert_eq!(plan_status_to_core(plan_status_to_db(status)), status);
        }
    }

    #[test]
    fn test_field_without_options() {
        let model = plan_fields::Model {
            id: Uuid::now_v7(),
            plan_type_id: Uuid::now_v7(),
            field_name: "Nombre del gestor".into(),
            field_type: "automatic".into(),
            is_required: false,
            field_order: 1,
            dropdown_options: None,
            created_at: Utc::now().into(),
        };
        let field = field_from_model(model).unwrap();
        assert_eq!(field.field_type, "automatic");
        assert!(field.dropdown_options.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_plan_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<plans::Model>::new()])
            .into_connection();
        let store = DbStore::new(db);

        let err = store.fetch_plan(PlanId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "plan", .. }));
    }

    #[tokio::test]
    async fn test_update_plan_status_writes_review() {
        let current = plan(PlanStatus::Submitted);
        let coordinator = ActorContext::new(UserId::new(), UserRole::Coordinator);
        let transition = PlanLifecycle::reject(
            lifecycle::PlanStatus::Submitted,
            &coordinator,
            Some("Missing hours on axis 2".into()),
        )
        .unwrap();
        let update = PlanStatusUpdate::from(&transition);

        let mut stored = current.clone();
        stored.status = PlanStatus::Rejected;
        stored.approved_by = Some(coordinator.user_id.into_inner());
        stored.approval_comments = Some("Missing hours on axis 2".into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()]])
            .append_query_results([vec![stored]])
            .into_connection();
        let store = DbStore::new(db);

        let plan = store
            .update_plan_status(PlanId::from_uuid(current.id), &update)
            .await
            .unwrap();
        assert_eq!(plan.status, lifecycle::PlanStatus::Rejected);
        assert_eq!(plan.approved_by, Some(coordinator.user_id));
        assert_eq!(
            plan.approval_comments.as_deref(),
            Some("Missing hours on axis 2")
        );
    }

    #[tokio::test]
    async fn test_upsert_assignment_returns_stored_row() {
        let assignment = Assignment {
            id: AssignmentId::new(),
            plan_id: PlanId::new(),
            product_id: ProductId::new(),
            assigned_hours: dec!(12.5),
        };
        let now: DateTimeWithTimeZone = Utc::now().into();
        let existing_id = Uuid::now_v7();
        let stored = assignments::Model {
            id: existing_id,
            plan_id: assignment.plan_id.into_inner(),
            product_id: assignment.product_id.into_inner(),
            assigned_hours: dec!(12.5),
            created_at: now,
            updated_at: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();
        let store = DbStore::new(db);

        let saved = store.upsert_assignment(&assignment).await.unwrap();
        assert_eq!(saved.id, AssignmentId::from_uuid(existing_id));
        assert_eq!(saved.assigned_hours, dec!(12.5));
    }

    #[tokio::test]
    async fn test_fetch_field_responses_decodes_values() {
        let field_id = Uuid::now_v7();
        let plan_id = PlanId::new();
        let row = plan_field_responses::Model {
            id: Uuid::now_v7(),
            plan_id: plan_id.into_inner(),
            plan_field_id: field_id,
            value: json!({"type": "text", "value": "Virtual"}),
            updated_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let store = DbStore::new(db);

        let responses = store.fetch_field_responses(plan_id).await.unwrap();
        assert_eq!(
            responses.get(&PlanFieldId::from_uuid(field_id)),
            Some(&FieldValue::Text("Virtual".into()))
        );
    }

    #[tokio::test]
    async fn test_save_field_responses_replaces_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let store = DbStore::new(db);

        let responses =
            FieldResponses::from([(PlanFieldId::new(), FieldValue::Number(dec!(40)))]);
        store
            .save_field_responses(PlanId::new(), &responses)
            .await
            .unwrap();
    }
}
