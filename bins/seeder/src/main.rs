//! Database seeder for Gestor development and testing.
//!
//! Seeds the strategic taxonomy (axes, actions, products) and the two
//! default plan types with their field lists. Running it twice is safe;
//! records that already exist are skipped.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use gestor_core::fields::{FieldKind, PlanField, StoredPlanField};
use gestor_core::taxonomy::{TaxonomyLevel, UsageTag, UsageTags};
use gestor_db::entities::{actions, plan_fields, plan_types, products, strategic_axes};
use gestor_shared::types::{PlanFieldId, PlanTypeId};
use gestor_shared::AppConfig;
use gestor_shared::telemetry::init_tracing;

/// Structured plan type name.
const WORK_PLAN_TYPE: &str = "Plan de Trabajo";
/// Field-list plan type name.
const IMPROVEMENT_PLAN_TYPE: &str = "Plan de Mejoramiento";

/// One strategic axis with its actions, each with its products.
struct AxisSeed {
    code: &'static str,
    name: &'static str,
    actions: &'static [ActionSeed],
}

struct ActionSeed {
    code: &'static str,
    name: &'static str,
    products: &'static [&'static str],
}

const TAXONOMY: &[AxisSeed] = &[
    AxisSeed {
        code: "EJE-1",
        name: "Docencia",
        actions: &[
            ActionSeed {
                code: "A-1.1",
                name: "Actualización curricular",
                products: &["Syllabus actualizado", "Guía de laboratorio"],
            },
            ActionSeed {
                code: "A-1.2",
                name: "Acompañamiento estudiantil",
                products: &["Tutorías registradas"],
            },
        ],
    },
    AxisSeed {
        code: "EJE-2",
        name: "Investigación",
        actions: &[ActionSeed {
            code: "A-2.1",
            name: "Producción académica",
            products: &["Artículo sometido", "Ponencia en evento"],
        }],
    },
    AxisSeed {
        code: "EJE-3",
        name: "Extensión",
        actions: &[ActionSeed {
            code: "A-3.1",
            name: "Proyección social",
            products: &["Taller comunitario"],
        }],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let db = gestor_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected to database");

    seed_taxonomy(&db).await?;
    seed_plan_types(&db).await?;

    tracing::info!("Seeding complete");
    Ok(())
}

fn tags(usage: &[UsageTag]) -> serde_json::Value {
    serde_json::json!(UsageTags::new(usage.iter().copied()).labels())
}

/// Seeds axes, actions and products tagged for work plans.
async fn seed_taxonomy(db: &DatabaseConnection) -> anyhow::Result<()> {
    for axis in TAXONOMY {
        if strategic_axes::Entity::find()
            .filter(strategic_axes::Column::Code.eq(axis.code))
            .one(db)
            .await?
            .is_some()
        {
            tracing::info!(code = axis.code, "Axis already exists, skipping");
            continue;
        }

        let now = Utc::now();
        let axis_id = Uuid::now_v7();
        strategic_axes::ActiveModel {
            id: Set(axis_id),
            code: Set(axis.code.to_string()),
            name: Set(axis.name.to_string()),
            description: Set(None),
            usage_tags: Set(tags(&[UsageTag::WorkPlan, UsageTag::ReportTemplate])),
            created_at: Set(now.into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("failed to insert axis {}", axis.code))?;

        for action in axis.actions {
            let action_id = Uuid::now_v7();
            actions::ActiveModel {
                id: Set(action_id),
                code: Set(action.code.to_string()),
                name: Set(action.name.to_string()),
                strategic_axis_id: Set(axis_id),
                usage_tags: Set(tags(&[UsageTag::WorkPlan])),
                created_at: Set(now.into()),
            }
            .insert(db)
            .await
            .with_context(|| format!("failed to insert action {}", action.code))?;

            for name in action.products {
                products::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    name: Set((*name).to_string()),
                    action_id: Set(action_id),
                    usage_tags: Set(tags(&[UsageTag::WorkPlan])),
                    created_at: Set(Utc::now().into()),
                }
                .insert(db)
                .await
                .with_context(|| format!("failed to insert product {name}"))?;
            }
        }

        tracing::info!(code = axis.code, actions = axis.actions.len(), "Seeded axis");
    }
    Ok(())
}

/// Seeds the structured work plan type and the field-list improvement plan type.
async fn seed_plan_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    insert_plan_type(db, WORK_PLAN_TYPE, true, "Asignación de horas por producto", |_| {
        Vec::new()
    })
    .await?;

    insert_plan_type(
        db,
        IMPROVEMENT_PLAN_TYPE,
        false,
        "Plan de mejoramiento con campos configurables",
        improvement_fields,
    )
    .await
}

fn improvement_fields(plan_type_id: PlanTypeId) -> Vec<PlanField> {
    let field = |order: i32, name: &str, kind: FieldKind, required: bool, options: &[&str]| {
        PlanField {
            id: PlanFieldId::new(),
            plan_type_id,
            field_name: name.to_string(),
            kind,
            is_required: required,
            order,
            dropdown_options: options.iter().map(ToString::to_string).collect(),
        }
    };

    vec![
        field(1, "Datos del gestor", FieldKind::SectionHeader, false, &[]),
        field(2, "Nombre del gestor", FieldKind::Automatic, false, &[]),
        field(3, "Programa académico", FieldKind::Automatic, false, &[]),
        field(4, "Fecha de elaboración", FieldKind::Automatic, false, &[]),
        field(
            5,
            "Ejes estratégicos",
            FieldKind::TaxonomyMultiSelect(TaxonomyLevel::StrategicAxis),
            true,
            &[],
        ),
        field(
            6,
            "Acciones",
            FieldKind::TaxonomyMultiSelect(TaxonomyLevel::Action),
            true,
            &[],
        ),
        field(
            7,
            "Productos",
            FieldKind::TaxonomyMultiSelect(TaxonomyLevel::Product),
            false,
            &[],
        ),
        field(
            8,
            "Modalidad",
            FieldKind::Dropdown,
            true,
            &["Presencial", "Virtual", "Mixta"],
        ),
        field(9, "Horas estimadas", FieldKind::Numeric, false, &[]),
        field(10, "Observaciones", FieldKind::LongText, false, &[]),
        field(11, "Soporte", FieldKind::File, false, &[]),
    ]
}

async fn insert_plan_type(
    db: &DatabaseConnection,
    name: &str,
    structured: bool,
    description: &str,
    fields: impl FnOnce(PlanTypeId) -> Vec<PlanField>,
) -> anyhow::Result<()> {
    if plan_types::Entity::find()
        .filter(plan_types::Column::Name.eq(name))
        .one(db)
        .await?
        .is_some()
    {
        tracing::info!(name, "Plan type already exists, skipping");
        return Ok(());
    }

    let plan_type_id = PlanTypeId::new();
    plan_types::ActiveModel {
        id: Set(plan_type_id.into_inner()),
        name: Set(name.to_string()),
        uses_structured_elements: Set(structured),
        description: Set(Some(description.to_string())),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .with_context(|| format!("failed to insert plan type {name}"))?;

    let fields = fields(plan_type_id);
    for field in &fields {
        let stored = StoredPlanField::from(field);
        plan_fields::ActiveModel {
            id: Set(stored.id.into_inner()),
            plan_type_id: Set(stored.plan_type_id.into_inner()),
            field_name: Set(stored.field_name.clone()),
            field_type: Set(stored.field_type),
            is_required: Set(stored.is_required),
            field_order: Set(stored.order),
            dropdown_options: Set((!stored.dropdown_options.is_empty())
                .then(|| serde_json::json!(stored.dropdown_options))),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("failed to insert field {}", stored.field_name))?;
    }

    tracing::info!(name, fields = fields.len(), "Seeded plan type");
    Ok(())
}
