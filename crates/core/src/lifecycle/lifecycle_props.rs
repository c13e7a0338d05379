//! Property-based tests for the plan and report state machines.

use proptest::prelude::*;
use uuid::Uuid;

use gestor_shared::types::UserId;

use crate::context::{ActorContext, UserRole};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::plan::PlanLifecycle;
use crate::lifecycle::report::ReportLifecycle;
use crate::lifecycle::types::{PlanStatus, PlanTransition, ReportStatus};

fn arb_plan_status() -> impl Strategy<Value = PlanStatus> {
    prop_oneof![
        Just(PlanStatus::Draft),
        Just(PlanStatus::Submitted),
        Just(PlanStatus::Approved),
        Just(PlanStatus::Rejected),
    ]
}

fn arb_report_status() -> impl Strategy<Value = ReportStatus> {
    prop_oneof![
        Just(ReportStatus::Draft),
        Just(ReportStatus::Submitted),
        Just(ReportStatus::Reviewed),
    ]
}

fn arb_role() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Manager),
        Just(UserRole::Coordinator),
        Just(UserRole::Administrator),
    ]
}

fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn arb_comments() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-zA-Z][a-zA-Z0-9 ]{0,60}".prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Submit succeeds exactly from the editable states.
    #[test]
    fn prop_submit_only_from_editable(status in arb_plan_status(), user in arb_user_id()) {
        let result = PlanLifecycle::submit(status, user);
        prop_assert_eq!(result.is_ok(), status.is_editable());
        if let Ok(transition) = result {
            prop_assert_eq!(transition.new_status(), PlanStatus::Submitted);
        }
    }

    /// Approve and reject succeed only for reviewers on submitted plans.
    #[test]
    fn prop_review_gated_by_role_and_status(
        status in arb_plan_status(),
        role in arb_role(),
        user in arb_user_id(),
        comments in arb_comments(),
    ) {
        let actor = ActorContext::new(user, role);
        let approve = PlanLifecycle::approve(status, &actor, comments.clone());
        let reject = PlanLifecycle::reject(status, &actor, comments);
        let allowed = role.is_reviewer() && status == PlanStatus::Submitted;
        prop_assert_eq!(approve.is_ok(), allowed);
        prop_assert_eq!(reject.is_ok(), allowed);

        if !role.is_reviewer() {
            let is_role_error = matches!(approve, Err(LifecycleError::InsufficientRole { .. }));
            prop_assert!(is_role_error);
        }
    }

    /// Approval carries the reviewer identity and comment through.
    #[test]
    fn prop_approve_audit_fields(user in arb_user_id(), comments in arb_comments()) {
        let actor = ActorContext::new(user, UserRole::Coordinator);
        let transition = PlanLifecycle::approve(PlanStatus::Submitted, &actor, comments.clone())
            .expect("submitted plan approves");
        if let PlanTransition::Approve { approved_by, comments: recorded, .. } = transition {
            prop_assert_eq!(approved_by, user);
            prop_assert_eq!(recorded, comments);
        } else {
            prop_assert!(false, "Expected Approve transition");
        }
    }

    /// Every successful transition is listed by is_valid_transition.
    #[test]
    fn prop_transitions_agree_with_table(status in arb_plan_status(), user in arb_user_id()) {
        let actor = ActorContext::new(user, UserRole::Administrator);
        let attempts = [
            PlanLifecycle::submit(status, user),
            PlanLifecycle::approve(status, &actor, None),
            PlanLifecycle::reject(status, &actor, None),
        ];
        for transition in attempts.into_iter().flatten() {
            prop_assert!(PlanLifecycle::is_valid_transition(status, transition.new_status()));
        }
    }

    /// Report submission needs a draft report and an approved plan.
    #[test]
    fn prop_report_submit_requires_approved_plan(
        report_status in arb_report_status(),
        plan_status in arb_plan_status(),
        user in arb_user_id(),
        total in 0u8..=100,
    ) {
        let result = ReportLifecycle::submit(report_status, plan_status, user, total);
        let allowed = report_status == ReportStatus::Draft && plan_status == PlanStatus::Approved;
        prop_assert_eq!(result.is_ok(), allowed);
        if let Ok(transition) = result {
            prop_assert!(ReportLifecycle::is_valid_transition(report_status, transition.new_status()));
        }
    }
}
