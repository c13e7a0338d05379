//! Plan service.
//!
//! Each method is one user action: it loads what it needs from the store,
//! applies the domain rules and writes the result. Nothing is retried.

use std::sync::Arc;

use gestor_shared::types::{PlanId, PlanTypeId, ProductId};
use rust_decimal::Decimal;

use crate::assignment::{Assignment, AssignmentBuilder, HourBudget};
use crate::context::ActorContext;
use crate::fields::{FieldEngine, FieldResponses, FieldSpec, FieldViolation, PlanField};
use crate::hierarchy::{OrganizedTree, organize};
use crate::lifecycle::{PlanLifecycle, PlanTransition};
use crate::plan::error::PlanError;
use crate::plan::types::{Plan, PlanStatusUpdate, PlanType};
use crate::ports::{PlanStore, TaxonomySource};
use crate::progress::ProgressSnapshot;

/// Plan operations over a store.
pub struct PlanService<S> {
    store: Arc<S>,
}

impl<S> PlanService<S>
where
    S: PlanStore + TaxonomySource,
{
    /// Create a new plan service.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a draft plan owned by the actor.
    pub async fn create_plan(
        &self,
        ctx: &ActorContext,
        plan_type_id: PlanTypeId,
        title: &str,
    ) -> Result<Plan, PlanError> {
        let plan_type = self.store.fetch_plan_type(plan_type_id).await?;
        let plan = self
            .store
            .create_plan(&Plan::new_draft(plan_type.id, ctx.user_id, title.trim()))
            .await?;

        tracing::info!(
            plan_id = %plan.id,
            plan_type = %plan_type.name,
            manager_id = %ctx.user_id,
            "Created plan"
        );
        Ok(plan)
    }

    /// Set the hours of one product and persist the assignment.
    pub async fn set_hours(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
        product_id: ProductId,
        hours: Decimal,
    ) -> Result<Assignment, PlanError> {
        let (plan, plan_type) = self.owned_plan(ctx, plan_id).await?;
        if !plan_type.uses_structured_elements {
            return Err(PlanError::NotStructured);
        }

        let mut builder = self.builder(&plan, true).await?;
        let assignment = builder.set_hours(product_id, hours)?;
        let saved = self.store.upsert_assignment(&assignment).await?;

        tracing::debug!(
            plan_id = %plan_id,
            product_id = %product_id,
            hours = %saved.assigned_hours,
            "Saved assignment"
        );
        Ok(saved)
    }

    /// Assigned hours against the actor's allocation. Advisory only.
    pub async fn hour_budget(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
    ) -> Result<HourBudget, PlanError> {
        let (plan, _) = self.owned_plan(ctx, plan_id).await?;
        let builder = self.builder(&plan, false).await?;
        builder
            .hour_budget(ctx.profile.allocated_hours)
            .map_err(PlanError::from)
    }

    /// The plan's assignments grouped by axis and action.
    pub async fn organized_assignments(
        &self,
        plan_id: PlanId,
    ) -> Result<OrganizedTree<Assignment>, PlanError> {
        let assignments = self.store.fetch_assignments(plan_id).await?;
        Ok(organize(&assignments, |_| ProgressSnapshot::default()))
    }

    /// Renderable fields of a custom plan with its current responses.
    pub async fn resolve_fields(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
    ) -> Result<Vec<FieldSpec>, PlanError> {
        let plan = self.store.fetch_plan(plan_id).await?;
        let engine = self.custom_engine(plan.plan_type_id).await?;
        let responses = self.store.fetch_field_responses(plan_id).await?;
        let taxonomy = self
            .store
            .fetch_plan_type_elements(plan.plan_type_id)
            .await?;
        Ok(engine.resolve_with_responses(ctx, &taxonomy, &responses))
    }

    /// Save draft responses of a custom plan.
    ///
    /// Missing required values are allowed here; malformed values are not.
    pub async fn save_responses(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
        responses: &FieldResponses,
    ) -> Result<(), PlanError> {
        let (plan, _) = self.owned_plan(ctx, plan_id).await?;
        if !plan.status.is_editable() {
            return Err(crate::lifecycle::LifecycleError::NotEditable.into());
        }
        let engine = self.custom_engine(plan.plan_type_id).await?;

        let malformed: Vec<FieldViolation> = engine
            .validate(responses)
            .into_iter()
            .filter(|v| !matches!(v, FieldViolation::Missing { .. }))
            .collect();
        if !malformed.is_empty() {
            return Err(PlanError::InvalidResponses(malformed));
        }

        self.store.save_field_responses(plan_id, responses).await?;
        Ok(())
    }

    /// Submit a draft or rejected plan.
    ///
    /// Custom plans must have every required field answered first.
    pub async fn submit(&self, ctx: &ActorContext, plan_id: PlanId) -> Result<Plan, PlanError> {
        let (plan, plan_type) = self.owned_plan(ctx, plan_id).await?;

        if !plan_type.uses_structured_elements {
            let engine = self.custom_engine(plan.plan_type_id).await?;
            let responses = self.store.fetch_field_responses(plan_id).await?;
            let missing = engine.missing_required(&responses);
            if !missing.is_empty() {
                tracing::info!(
                    plan_id = %plan_id,
                    missing = missing.len(),
                    "Plan submission blocked by missing fields"
                );
                return Err(PlanError::MissingRequiredFields(missing));
            }
        }

        let transition = PlanLifecycle::submit(plan.status, ctx.user_id)?;
        self.write_transition(&plan, &transition).await
    }

    /// Approve a submitted plan. Coordinator or administrator only.
    pub async fn approve(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
        comments: Option<String>,
    ) -> Result<Plan, PlanError> {
        let plan = self.store.fetch_plan(plan_id).await?;
        let transition = PlanLifecycle::approve(plan.status, ctx, comments)?;
        self.write_transition(&plan, &transition).await
    }

    /// Reject a submitted plan. Coordinator or administrator only.
    pub async fn reject(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
        comments: Option<String>,
    ) -> Result<Plan, PlanError> {
        let plan = self.store.fetch_plan(plan_id).await?;
        let transition = PlanLifecycle::reject(plan.status, ctx, comments)?;
        self.write_transition(&plan, &transition).await
    }

    async fn owned_plan(
        &self,
        ctx: &ActorContext,
        plan_id: PlanId,
    ) -> Result<(Plan, PlanType), PlanError> {
        let plan = self.store.fetch_plan(plan_id).await?;
        ctx.ensure_owner(plan.manager_id)?;
        let plan_type = self.store.fetch_plan_type(plan.plan_type_id).await?;
        Ok((plan, plan_type))
    }

    async fn builder(&self, plan: &Plan, editable: bool) -> Result<AssignmentBuilder, PlanError> {
        let taxonomy = self
            .store
            .fetch_plan_type_elements(plan.plan_type_id)
            .await?;
        let existing = self
            .store
            .fetch_assignments(plan.id)
            .await?
            .into_iter()
            .map(|linked| linked.item);

        if editable {
            Ok(AssignmentBuilder::for_plan(plan, &taxonomy, existing)?)
        } else {
            Ok(AssignmentBuilder::load(plan.id, &taxonomy, existing))
        }
    }

    async fn custom_engine(&self, plan_type_id: PlanTypeId) -> Result<FieldEngine, PlanError> {
        let plan_type = self.store.fetch_plan_type(plan_type_id).await?;
        if plan_type.uses_structured_elements {
            return Err(PlanError::NotCustom);
        }
        let fields = self
            .store
            .fetch_plan_fields(plan_type_id)
            .await?
            .into_iter()
            .map(PlanField::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FieldEngine::new(fields))
    }

    async fn write_transition(
        &self,
        plan: &Plan,
        transition: &PlanTransition,
    ) -> Result<Plan, PlanError> {
        let update = PlanStatusUpdate::from(transition);
        let updated = self.store.update_plan_status(plan.id, &update).await?;

        tracing::info!(
            plan_id = %plan.id,
            from = %plan.status,
            to = %updated.status,
            "Plan status changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::UserRole;
    use crate::fields::{FieldError, FieldKind, FieldValue, StoredPlanField};
    use crate::lifecycle::{LifecycleError, PlanStatus};
    use crate::test_support::{InMemoryStore, TaxonomyFixture};
    use gestor_shared::types::{PlanFieldId, UserId};
    use rust_decimal_macros::dec;

    struct Harness {
        fx: TaxonomyFixture,
        store: Arc<InMemoryStore>,
        service: PlanService<InMemoryStore>,
        manager: ActorContext,
        coordinator: ActorContext,
    }

    fn harness() -> Harness {
        let fx = TaxonomyFixture::new();
        let store = Arc::new(InMemoryStore::with_taxonomy(fx.taxonomy.clone()));
        Harness {
            service: PlanService::new(store.clone()),
            store,
            fx,
            manager: ActorContext::new(UserId::new(), UserRole::Manager),
            coordinator: ActorContext::new(UserId::new(), UserRole::Coordinator),
        }
    }

    fn custom_type(h: &Harness) -> (PlanTypeId, PlanField, PlanField) {
        let plan_type = h.store.add_plan_type("Plan de gestión", false);
        let modality = PlanField {
            id: PlanFieldId::new(),
            plan_type_id: plan_type,
            field_name: "Modalidad".into(),
            kind: FieldKind::Dropdown,
            is_required: true,
            order: 1,
            dropdown_options: vec!["Presencial".into(), "Virtual".into()],
        };
        let notes = PlanField {
            id: PlanFieldId::new(),
            plan_type_id: plan_type,
            field_name: "Notas".into(),
            kind: FieldKind::LongText,
            is_required: false,
            order: 2,
            dropdown_options: Vec::new(),
        };
        h.store.add_plan_field(modality.clone());
        h.store.add_plan_field(notes.clone());
        (plan_type, modality, notes)
    }

    #[tokio::test]
    async fn test_full_structured_flow() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h
            .service
            .create_plan(&h.manager, plan_type, "  Plan 2026-1 ")
            .await
            .unwrap();
        assert_eq!(plan.title, "Plan 2026-1");

        h.service
            .set_hours(&h.manager, plan.id, h.fx.product_a1.id, dec!(10))
            .await
            .unwrap();
        h.service
            .set_hours(&h.manager, plan.id, h.fx.product_b1.id, dec!(5))
            .await
            .unwrap();

        let tree = h.service.organized_assignments(plan.id).await.unwrap();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.axes.len(), 2);

        let submitted = h.service.submit(&h.manager, plan.id).await.unwrap();
        assert_eq!(submitted.status, PlanStatus::Submitted);
        assert!(submitted.submitted_date.is_some());

        let approved = h
            .service
            .approve(&h.coordinator, plan.id, Some("OK".into()))
            .await
            .unwrap();
        assert_eq!(approved.status, PlanStatus::Approved);
        assert_eq!(approved.approved_by, Some(h.coordinator.user_id));
    }

    #[tokio::test]
    async fn test_set_hours_twice_updates_single_assignment() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        h.service
            .set_hours(&h.manager, plan.id, h.fx.product_a1.id, dec!(10))
            .await
            .unwrap();
        h.service
            .set_hours(&h.manager, plan.id, h.fx.product_a1.id, dec!(4))
            .await
            .unwrap();

        let assignments = h.store.assignments_of(plan.id);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].assigned_hours, dec!(4));
    }

    #[tokio::test]
    async fn test_hours_frozen_after_submit() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();
        h.service.submit(&h.manager, plan.id).await.unwrap();

        let err = h
            .service
            .set_hours(&h.manager, plan.id, h.fx.product_a1.id, dec!(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Assignment(crate::assignment::AssignmentError::PlanNotEditable { .. })
        ));
    }

    #[tokio::test]
    async fn test_other_manager_cannot_edit() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();
        let intruder = ActorContext::new(UserId::new(), UserRole::Manager);

        let err = h
            .service
            .set_hours(&intruder, plan.id, h.fx.product_a1.id, dec!(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Lifecycle(LifecycleError::NotOwner { .. })
        ));
    }

    #[tokio::test]
    async fn test_approve_draft_fails() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        let err = h
            .service
            .approve(&h.coordinator, plan.id, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Lifecycle(LifecycleError::InvalidPlanTransition { .. })
        ));
        assert_eq!(h.store.plan(plan.id).status, PlanStatus::Draft);
    }

    #[tokio::test]
    async fn test_manager_cannot_approve_own_plan() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();
        h.service.submit(&h.manager, plan.id).await.unwrap();

        let err = h.service.approve(&h.manager, plan.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Lifecycle(LifecycleError::InsufficientRole { .. })
        ));
    }

    #[tokio::test]
    async fn test_reject_and_resubmit_keeps_comments() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();
        h.service.submit(&h.manager, plan.id).await.unwrap();
        h.service
            .reject(&h.coordinator, plan.id, Some("Add axis 2 hours".into()))
            .await
            .unwrap();

        h.service
            .set_hours(&h.manager, plan.id, h.fx.product_b1.id, dec!(6))
            .await
            .unwrap();
        let resubmitted = h.service.submit(&h.manager, plan.id).await.unwrap();

        assert_eq!(resubmitted.status, PlanStatus::Submitted);
        assert_eq!(
            resubmitted.approval_comments.as_deref(),
            Some("Add axis 2 hours")
        );
    }

    #[tokio::test]
    async fn test_custom_plan_requires_fields_before_submit() {
        let h = harness();
        let (plan_type, modality, notes) = custom_type(&h);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        let err = h.service.submit(&h.manager, plan.id).await.unwrap_err();
        match err {
            PlanError::MissingRequiredFields(missing) => assert_eq!(missing, vec![modality.id]),
            other => panic!("expected missing fields, got {other:?}"),
        }

        let responses = FieldResponses::from([
            (modality.id, FieldValue::Text("Virtual".into())),
            (notes.id, FieldValue::Text("Sin novedades".into())),
        ]);
        h.service
            .save_responses(&h.manager, plan.id, &responses)
            .await
            .unwrap();
        let submitted = h.service.submit(&h.manager, plan.id).await.unwrap();
        assert_eq!(submitted.status, PlanStatus::Submitted);
    }

    #[tokio::test]
    async fn test_save_responses_rejects_unknown_option() {
        let h = harness();
        let (plan_type, modality, _) = custom_type(&h);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        let responses = FieldResponses::from([(modality.id, FieldValue::Text("Mixta".into()))]);
        let err = h
            .service
            .save_responses(&h.manager, plan.id, &responses)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidResponses(v) if v.len() == 1));
        assert!(h.store.responses_of(plan.id).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_field_tag_surfaces_as_field_error() {
        let h = harness();
        let (plan_type, modality, _) = custom_type(&h);
        h.store.add_stored_field(StoredPlanField {
            field_type: "signature".into(),
            id: PlanFieldId::new(),
            ..StoredPlanField::from(&modality)
        });
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        let err = h
            .service
            .resolve_fields(&h.manager, plan.id)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Field(FieldError::UnknownKind { .. })));
    }

    #[tokio::test]
    async fn test_hours_on_custom_plan_refused() {
        let h = harness();
        let (plan_type, _, _) = custom_type(&h);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        let err = h
            .service
            .set_hours(&h.manager, plan.id, h.fx.product_a1.id, dec!(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::NotStructured));
    }

    #[tokio::test]
    async fn test_hour_budget_uses_profile_allocation() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let mut manager = h.manager.clone();
        manager.profile.allocated_hours = Some(dec!(12));
        let plan = h.service.create_plan(&manager, plan_type, "P").await.unwrap();
        h.service
            .set_hours(&manager, plan.id, h.fx.product_a1.id, dec!(10))
            .await
            .unwrap();
        h.service
            .set_hours(&manager, plan.id, h.fx.product_a2.id, dec!(5))
            .await
            .unwrap();

        let budget = h.service.hour_budget(&manager, plan.id).await.unwrap();
        assert_eq!(budget.assigned, dec!(15));
        assert!(budget.over_budget);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();
        h.store.fail_plan_status_updates(true);

        let err = h.service.submit(&h.manager, plan.id).await.unwrap_err();
        assert!(matches!(err, PlanError::Store(_)));
        assert_eq!(h.store.plan(plan.id).status, PlanStatus::Draft);
    }

    #[tokio::test]
    async fn test_oversized_hours_are_a_validation_error() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();

        let err = h
            .service
            .set_hours(&h.manager, plan.id, h.fx.product_a1.id, dec!(100000000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Assignment(crate::assignment::AssignmentError::HoursOutOfRange { .. })
        ));
        assert!(h.store.assignments_of(plan.id).is_empty());
    }

    #[tokio::test]
    async fn test_hour_budget_overflow_is_reported() {
        let h = harness();
        let plan_type = h.store.add_plan_type("Plan de trabajo", true);
        let plan = h.service.create_plan(&h.manager, plan_type, "P").await.unwrap();
        h.store
            .insert_assignment(plan.id, h.fx.product_a1.id, rust_decimal::Decimal::MAX);
        h.store
            .insert_assignment(plan.id, h.fx.product_b1.id, rust_decimal::Decimal::MAX);

        let err = h.service.hour_budget(&h.manager, plan.id).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::Assignment(crate::assignment::AssignmentError::TotalOverflow)
        ));
    }
}
