//! Shared fixtures and in-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use gestor_shared::types::{
    ActionId, AssignmentId, ManagerReportId, PlanId, PlanTypeId, ProductId, ReportPeriodId,
    StrategicAxisId, UserId,
};
use rust_decimal::Decimal;

use crate::assignment::Assignment;
use crate::fields::{FieldResponses, PlanField, StoredPlanField};
use crate::hierarchy::Linked;
use crate::lifecycle::PlanStatus;
use crate::plan::{Plan, PlanStatusUpdate, PlanType};
use crate::ports::{EvidenceStore, PlanStore, ReportStore, StoreError, TaxonomySource};
use crate::progress::ProductProgressReport;
use crate::report::{ManagerReport, ReportStatusUpdate};
use crate::storage::{EvidenceFile, EvidenceRef, StorageError};
use crate::taxonomy::{Action, Product, StrategicAxis, Taxonomy, UsageTag, UsageTags};

/// Two axes, one action each, two work-plan products per action, plus one
/// product under action A that is tagged for report templates only.
pub struct TaxonomyFixture {
    pub taxonomy: Taxonomy,
    pub axis_a: StrategicAxis,
    pub axis_b: StrategicAxis,
    pub action_a: Action,
    pub action_b: Action,
    pub product_a1: Product,
    pub product_a2: Product,
    pub product_b1: Product,
    pub product_b2: Product,
    pub report_only_product: Product,
}

impl TaxonomyFixture {
    pub fn new() -> Self {
        let work_plan = || UsageTags::new([UsageTag::WorkPlan]);

        let axis = |code: &str, name: &str| StrategicAxis {
            id: StrategicAxisId::new(),
            code: code.into(),
            name: name.into(),
            description: None,
            usage_tags: work_plan(),
        };
        let axis_a = axis("EJE-1", "Docencia");
        let axis_b = axis("EJE-2", "Investigación");

        let action = |code: &str, axis: &StrategicAxis| Action {
            id: ActionId::new(),
            code: code.into(),
            name: format!("Acción {code}"),
            strategic_axis_id: axis.id,
            usage_tags: work_plan(),
        };
        let action_a = action("A-1", &axis_a);
        let action_b = action("B-1", &axis_b);

        let product = |name: &str, action: &Action, usage_tags: UsageTags| Product {
            id: ProductId::new(),
            name: name.into(),
            action_id: action.id,
            usage_tags,
        };
        let product_a1 = product("Syllabus", &action_a, work_plan());
        let product_a2 = product("Tutorías", &action_a, work_plan());
        let product_b1 = product("Artículo", &action_b, work_plan());
        let product_b2 = product("Ponencia", &action_b, work_plan());
        let report_only_product = product(
            "Informe de gestión",
            &action_a,
            UsageTags::new([UsageTag::ReportTemplate]),
        );

        let taxonomy = Taxonomy {
            strategic_axes: vec![axis_a.clone(), axis_b.clone()],
            actions: vec![action_a.clone(), action_b.clone()],
            products: vec![
                product_a1.clone(),
                product_a2.clone(),
                product_b1.clone(),
                product_b2.clone(),
                report_only_product.clone(),
            ],
        };

        Self {
            taxonomy,
            axis_a,
            axis_b,
            action_a,
            action_b,
            product_a1,
            product_a2,
            product_b1,
            product_b2,
            report_only_product,
        }
    }

    /// The four work-plan products: A1, A2, B1, B2.
    pub fn products(&self) -> [Product; 4] {
        [
            self.product_a1.clone(),
            self.product_a2.clone(),
            self.product_b1.clone(),
            self.product_b2.clone(),
        ]
    }

    /// Wraps an item with the joins of `product_id`.
    pub fn linked<T>(&self, item: T, product_id: ProductId) -> Linked<T> {
        Linked::new(item, self.taxonomy.links_for(product_id))
    }
}

pub fn draft_plan() -> Plan {
    Plan::new_draft(PlanTypeId::new(), UserId::new(), "Plan de trabajo 2026-1")
}

#[derive(Default)]
struct StoreState {
    plan_types: HashMap<PlanTypeId, PlanType>,
    fields: Vec<StoredPlanField>,
    plans: HashMap<PlanId, Plan>,
    assignments: Vec<Assignment>,
    responses: HashMap<PlanId, FieldResponses>,
    reports: HashMap<ManagerReportId, ManagerReport>,
    progress: Vec<ProductProgressReport>,
    failing_products: HashSet<ProductId>,
    fail_plan_status: bool,
}

/// In-memory plan and report store.
pub struct InMemoryStore {
    taxonomy: Taxonomy,
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn with_taxonomy(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn add_plan_type(&self, name: &str, uses_structured_elements: bool) -> PlanTypeId {
        let plan_type = PlanType {
            id: PlanTypeId::new(),
            name: name.into(),
            uses_structured_elements,
            description: None,
        };
        let id = plan_type.id;
        self.state.lock().unwrap().plan_types.insert(id, plan_type);
        id
    }

    pub fn add_plan_field(&self, field: PlanField) {
        self.add_stored_field(StoredPlanField::from(&field));
    }

    pub fn add_stored_field(&self, field: StoredPlanField) {
        self.state.lock().unwrap().fields.push(field);
    }

    pub fn insert_plan(&self, plan: Plan) -> PlanId {
        let id = plan.id;
        self.state.lock().unwrap().plans.insert(id, plan);
        id
    }

    pub fn insert_assignment(&self, plan_id: PlanId, product_id: ProductId, hours: Decimal) {
        self.state.lock().unwrap().assignments.push(Assignment {
            id: AssignmentId::new(),
            plan_id,
            product_id,
            assigned_hours: hours,
        });
    }

    pub fn set_plan_status(&self, plan_id: PlanId, status: PlanStatus) {
        if let Some(plan) = self.state.lock().unwrap().plans.get_mut(&plan_id) {
            plan.status = status;
        }
    }

    pub fn plan(&self, plan_id: PlanId) -> Plan {
        self.state.lock().unwrap().plans[&plan_id].clone()
    }

    pub fn assignments_of(&self, plan_id: PlanId) -> Vec<Assignment> {
        self.state
            .lock()
            .unwrap()
            .assignments
            .iter()
            .filter(|a| a.plan_id == plan_id)
            .cloned()
            .collect()
    }

    pub fn responses_of(&self, plan_id: PlanId) -> FieldResponses {
        self.state
            .lock()
            .unwrap()
            .responses
            .get(&plan_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn report(&self, report_id: ManagerReportId) -> ManagerReport {
        self.state.lock().unwrap().reports[&report_id].clone()
    }

    pub fn progress_rows(&self, report_id: ManagerReportId) -> Vec<ProductProgressReport> {
        self.state
            .lock()
            .unwrap()
            .progress
            .iter()
            .filter(|r| r.manager_report_id == report_id)
            .cloned()
            .collect()
    }

    /// Upserts of progress rows for `product_id` fail from now on.
    pub fn fail_upserts_for(&self, product_id: ProductId) {
        self.state.lock().unwrap().failing_products.insert(product_id);
    }

    pub fn fail_plan_status_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_plan_status = fail;
    }
}

impl TaxonomySource for InMemoryStore {
    async fn fetch_plan_type_elements(
        &self,
        _plan_type_id: PlanTypeId,
    ) -> Result<Taxonomy, StoreError> {
        Ok(self.taxonomy.clone())
    }
}

impl PlanStore for InMemoryStore {
    async fn fetch_plan_type(&self, plan_type_id: PlanTypeId) -> Result<PlanType, StoreError> {
        self.state
            .lock()
            .unwrap()
            .plan_types
            .get(&plan_type_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("plan type", plan_type_id))
    }

    async fn fetch_plan_fields(
        &self,
        plan_type_id: PlanTypeId,
    ) -> Result<Vec<StoredPlanField>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .fields
            .iter()
            .filter(|f| f.plan_type_id == plan_type_id)
            .cloned()
            .collect())
    }

    async fn fetch_plan(&self, plan_id: PlanId) -> Result<Plan, StoreError> {
        self.state
            .lock()
            .unwrap()
            .plans
            .get(&plan_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("plan", plan_id))
    }

    async fn create_plan(&self, plan: &Plan) -> Result<Plan, StoreError> {
        self.insert_plan(plan.clone());
        Ok(plan.clone())
    }

    async fn update_plan_status(
        &self,
        plan_id: PlanId,
        update: &PlanStatusUpdate,
    ) -> Result<Plan, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_plan_status {
            return Err(StoreError::Backend("connection reset".into()));
        }
        let plan = state
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| StoreError::not_found("plan", plan_id))?;
        plan.apply(update);
        Ok(plan.clone())
    }

    async fn fetch_assignments(
        &self,
        plan_id: PlanId,
    ) -> Result<Vec<Linked<Assignment>>, StoreError> {
        Ok(self
            .assignments_of(plan_id)
            .into_iter()
            .map(|a| {
                let links = self.taxonomy.links_for(a.product_id);
                Linked::new(a, links)
            })
            .collect())
    }

    async fn upsert_assignment(&self, assignment: &Assignment) -> Result<Assignment, StoreError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .assignments
            .iter_mut()
            .find(|a| a.plan_id == assignment.plan_id && a.product_id == assignment.product_id);
        match existing {
            Some(row) => {
                row.assigned_hours = assignment.assigned_hours;
                Ok(row.clone())
            }
            None => {
                state.assignments.push(assignment.clone());
                Ok(assignment.clone())
            }
        }
    }

    async fn save_field_responses(
        &self,
        plan_id: PlanId,
        responses: &FieldResponses,
    ) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(plan_id, responses.clone());
        Ok(())
    }

    async fn fetch_field_responses(&self, plan_id: PlanId) -> Result<FieldResponses, StoreError> {
        Ok(self.responses_of(plan_id))
    }

    async fn list_approved_plans(&self, manager_id: UserId) -> Result<Vec<Plan>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .plans
            .values()
            .filter(|p| p.manager_id == manager_id && p.status == PlanStatus::Approved)
            .cloned()
            .collect())
    }
}

impl ReportStore for InMemoryStore {
    async fn find_report(
        &self,
        manager_id: UserId,
        plan_id: PlanId,
        report_period_id: ReportPeriodId,
    ) -> Result<Option<ManagerReport>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .reports
            .values()
            .find(|r| {
                r.manager_id == manager_id
                    && r.plan_id == plan_id
                    && r.report_period_id == report_period_id
            })
            .cloned())
    }

    async fn create_report(&self, report: &ManagerReport) -> Result<ManagerReport, StoreError> {
        self.state
            .lock()
            .unwrap()
            .reports
            .insert(report.id, report.clone());
        Ok(report.clone())
    }

    async fn fetch_report(&self, report_id: ManagerReportId) -> Result<ManagerReport, StoreError> {
        self.state
            .lock()
            .unwrap()
            .reports
            .get(&report_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("manager report", report_id))
    }

    async fn fetch_progress_reports(
        &self,
        report_id: ManagerReportId,
    ) -> Result<Vec<ProductProgressReport>, StoreError> {
        Ok(self.progress_rows(report_id))
    }

    async fn upsert_progress_report(
        &self,
        report: &ProductProgressReport,
    ) -> Result<ProductProgressReport, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_products.contains(&report.product_id) {
            return Err(StoreError::Backend("write timed out".into()));
        }
        let existing = state.progress.iter_mut().find(|r| {
            r.manager_report_id == report.manager_report_id && r.product_id == report.product_id
        });
        match existing {
            Some(row) => {
                let id = row.id;
                *row = ProductProgressReport { id, ..report.clone() };
                Ok(row.clone())
            }
            None => {
                state.progress.push(report.clone());
                Ok(report.clone())
            }
        }
    }

    async fn update_report_status(
        &self,
        report_id: ManagerReportId,
        update: &ReportStatusUpdate,
    ) -> Result<ManagerReport, StoreError> {
        let mut state = self.state.lock().unwrap();
        let report = state
            .reports
            .get_mut(&report_id)
            .ok_or_else(|| StoreError::not_found("manager report", report_id))?;
        report.apply(update);
        Ok(report.clone())
    }
}

/// Evidence store that records upload paths instead of writing bytes.
pub struct MockEvidenceStore {
    uploads: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl MockEvidenceStore {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    pub fn fail_uploads(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

impl EvidenceStore for MockEvidenceStore {
    async fn upload_evidence_file(
        &self,
        file: &EvidenceFile,
        bucket: &str,
        path: &str,
    ) -> Result<EvidenceRef, StorageError> {
        if *self.fail.lock().unwrap() {
            return Err(StorageError::operation("bucket unavailable"));
        }
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(EvidenceRef {
            public_url: format!("https://files.example.test/{bucket}/{path}"),
            storage_key: path.to_string(),
            file_name: file.file_name.clone(),
        })
    }

    fn evidence_bucket(&self) -> &str {
        "evidence"
    }
}
