//! Initial database migration.
//!
//! Creates the taxonomy, plan, assignment and report tables with the
//! unique keys the repositories upsert on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: STRATEGIC TAXONOMY
        // ============================================================
        db.execute_unprepared(STRATEGIC_AXES_SQL).await?;
        db.execute_unprepared(ACTIONS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 3: PLAN TYPES & FIELDS
        // ============================================================
        db.execute_unprepared(PLAN_TYPES_SQL).await?;
        db.execute_unprepared(PLAN_FIELDS_SQL).await?;

        // ============================================================
        // PART 4: PLANS
        // ============================================================
        db.execute_unprepared(PLANS_SQL).await?;
        db.execute_unprepared(PLAN_FIELD_RESPONSES_SQL).await?;
        db.execute_unprepared(ASSIGNMENTS_SQL).await?;

        // ============================================================
        // PART 5: REPORTS
        // ============================================================
        db.execute_unprepared(MANAGER_REPORTS_SQL).await?;
        db.execute_unprepared(PRODUCT_PROGRESS_REPORTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE plan_status AS ENUM ('draft', 'submitted', 'approved', 'rejected');
CREATE TYPE report_status AS ENUM ('draft', 'submitted', 'reviewed');
";

const STRATEGIC_AXES_SQL: &str = r"
CREATE TABLE strategic_axes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    usage_tags JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACTIONS_SQL: &str = r"
CREATE TABLE actions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    strategic_axis_id UUID NOT NULL REFERENCES strategic_axes(id) ON DELETE RESTRICT,
    usage_tags JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_actions_axis ON actions(strategic_axis_id);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    action_id UUID NOT NULL REFERENCES actions(id) ON DELETE RESTRICT,
    usage_tags JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_products_action ON products(action_id);
";

const PLAN_TYPES_SQL: &str = r"
CREATE TABLE plan_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    uses_structured_elements BOOLEAN NOT NULL DEFAULT true,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PLAN_FIELDS_SQL: &str = r"
CREATE TABLE plan_fields (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    plan_type_id UUID NOT NULL REFERENCES plan_types(id) ON DELETE CASCADE,
    field_name VARCHAR(255) NOT NULL,
    field_type VARCHAR(50) NOT NULL,
    is_required BOOLEAN NOT NULL DEFAULT false,
    field_order INTEGER NOT NULL DEFAULT 0,
    dropdown_options JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_plan_fields_type ON plan_fields(plan_type_id, field_order);
";

const PLANS_SQL: &str = r"
CREATE TABLE plans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    plan_type_id UUID NOT NULL REFERENCES plan_types(id) ON DELETE RESTRICT,
    manager_id UUID NOT NULL,
    title VARCHAR(255) NOT NULL,
    status plan_status NOT NULL DEFAULT 'draft',
    submitted_date TIMESTAMPTZ,
    approved_date TIMESTAMPTZ,
    approval_comments TEXT,
    approved_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_approved_has_date CHECK (status <> 'approved' OR approved_date IS NOT NULL)
);

CREATE INDEX idx_plans_manager ON plans(manager_id, status);
";

const PLAN_FIELD_RESPONSES_SQL: &str = r"
CREATE TABLE plan_field_responses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    plan_id UUID NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    plan_field_id UUID NOT NULL REFERENCES plan_fields(id) ON DELETE CASCADE,
    value JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX uq_plan_field_responses ON plan_field_responses(plan_id, plan_field_id);
";

const ASSIGNMENTS_SQL: &str = r"
CREATE TABLE assignments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    plan_id UUID NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    assigned_hours NUMERIC(10, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_hours_non_negative CHECK (assigned_hours >= 0)
);

CREATE UNIQUE INDEX uq_assignments_plan_product ON assignments(plan_id, product_id);
";

const MANAGER_REPORTS_SQL: &str = r"
CREATE TABLE manager_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    manager_id UUID NOT NULL,
    plan_id UUID NOT NULL REFERENCES plans(id) ON DELETE RESTRICT,
    report_period_id UUID NOT NULL,
    title VARCHAR(255) NOT NULL,
    status report_status NOT NULL DEFAULT 'draft',
    submitted_date TIMESTAMPTZ,
    total_progress_percentage SMALLINT,
    reviewed_by UUID,
    reviewed_date TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_total_progress_range CHECK (
        total_progress_percentage IS NULL
        OR total_progress_percentage BETWEEN 0 AND 100
    )
);

CREATE UNIQUE INDEX uq_manager_reports_period ON manager_reports(manager_id, plan_id, report_period_id);
";

const PRODUCT_PROGRESS_REPORTS_SQL: &str = r"
CREATE TABLE product_progress_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    manager_report_id UUID NOT NULL REFERENCES manager_reports(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    assignment_id UUID NOT NULL REFERENCES assignments(id) ON DELETE CASCADE,
    progress_percentage NUMERIC(5, 2) NOT NULL DEFAULT 0,
    observations TEXT,
    evidence_files JSONB NOT NULL DEFAULT '[]',
    evidence_file_names JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_progress_range CHECK (progress_percentage BETWEEN 0 AND 100),
    CONSTRAINT chk_evidence_parallel CHECK (
        jsonb_array_length(evidence_files) = jsonb_array_length(evidence_file_names)
    )
);

CREATE UNIQUE INDEX uq_progress_report_product ON product_progress_reports(manager_report_id, product_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS product_progress_reports;
DROP TABLE IF EXISTS manager_reports;
DROP TABLE IF EXISTS assignments;
DROP TABLE IF EXISTS plan_field_responses;
DROP TABLE IF EXISTS plans;
DROP TABLE IF EXISTS plan_fields;
DROP TABLE IF EXISTS plan_types;
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS actions;
DROP TABLE IF EXISTS strategic_axes;
DROP TYPE IF EXISTS report_status;
DROP TYPE IF EXISTS plan_status;
";
