//! Resolution and validation of a plan type's fields.

use chrono::{NaiveDate, Utc};
use gestor_shared::types::{ActionId, PlanFieldId, StrategicAxisId};
use uuid::Uuid;

use crate::context::ActorContext;
use crate::fields::kind::{DerivedSource, FieldKind};
use crate::fields::types::{
    FieldInput, FieldOption, FieldResponses, FieldSpec, FieldValue, FieldViolation, PlanField,
};
use crate::taxonomy::{Taxonomy, TaxonomyLevel};

/// The ordered fields of one plan type.
#[derive(Debug, Clone)]
pub struct FieldEngine {
    fields: Vec<PlanField>,
    today: NaiveDate,
}

impl FieldEngine {
    /// Creates an engine; fields are sorted by `order`, ties keep input order.
    #[must_use]
    pub fn new(mut fields: Vec<PlanField>) -> Self {
        fields.sort_by_key(|field| field.order);
        Self {
            fields,
            today: Utc::now().date_naive(),
        }
    }

    /// Fixes the date used by `CurrentDate` fields.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The sorted field definitions.
    #[must_use]
    pub fn fields(&self) -> &[PlanField] {
        &self.fields
    }

    /// Resolves every field with no responses yet.
    #[must_use]
    pub fn resolve(&self, ctx: &ActorContext, taxonomy: &Taxonomy) -> Vec<FieldSpec> {
        self.resolve_with_responses(ctx, taxonomy, &FieldResponses::new())
    }

    /// Resolves every field against the current responses.
    ///
    /// Action options are narrowed to the selected axes and product options
    /// to the selected actions. When a plan type has no field for the parent
    /// level, the child level is not narrowed.
    #[must_use]
    pub fn resolve_with_responses(
        &self,
        ctx: &ActorContext,
        taxonomy: &Taxonomy,
        responses: &FieldResponses,
    ) -> Vec<FieldSpec> {
        let selected_axes = self.selected_at(TaxonomyLevel::StrategicAxis, responses);
        let selected_actions = self.selected_at(TaxonomyLevel::Action, responses);

        self.fields
            .iter()
            .map(|field| {
                let response = responses.get(&field.id);
                let input = match field.kind {
                    FieldKind::Automatic => {
                        let source = DerivedSource::for_field(&field.field_name);
                        if source.is_none() {
                            tracing::warn!(
                                field_id = %field.id,
                                field_name = %field.field_name,
                                "Automatic field has no known source"
                            );
                        }
                        FieldInput::Derived {
                            source,
                            value: source
                                .and_then(|s| s.value(ctx, self.today))
                                .unwrap_or_default(),
                        }
                    }
                    FieldKind::SectionHeader => FieldInput::Section,
                    FieldKind::TaxonomyMultiSelect(level) => {
                        let options = match level {
                            TaxonomyLevel::StrategicAxis => axis_options(taxonomy),
                            TaxonomyLevel::Action => {
                                action_options(taxonomy, selected_axes.as_deref())
                            }
                            TaxonomyLevel::Product => {
                                product_options(taxonomy, selected_actions.as_deref())
                            }
                        };
                        let selected = response
                            .map(FieldValue::selection)
                            .unwrap_or_default()
                            .iter()
                            .copied()
                            .filter(|id| options.iter().any(|o| o.id == *id))
                            .collect();
                        FieldInput::MultiSelect {
                            level,
                            options,
                            selected,
                        }
                    }
                    FieldKind::Numeric => FieldInput::Numeric {
                        value: response.and_then(FieldValue::as_decimal),
                    },
                    FieldKind::ShortText => FieldInput::ShortText {
                        value: text_of(response).unwrap_or_default(),
                    },
                    FieldKind::LongText => FieldInput::LongText {
                        value: text_of(response).unwrap_or_default(),
                    },
                    FieldKind::Dropdown => FieldInput::Dropdown {
                        options: field.dropdown_options.clone(),
                        value: text_of(response).filter(|v| !v.is_empty()),
                    },
                    FieldKind::File => FieldInput::File {
                        url: text_of(response).filter(|v| !v.is_empty()),
                    },
                };

                FieldSpec {
                    field_id: field.id,
                    label: field.field_name.clone(),
                    required: field.is_required,
                    order: field.order,
                    input,
                }
            })
            .collect()
    }

    /// Ids of required fields without a present response, in field order.
    ///
    /// Automatic fields and section headers never count as missing.
    #[must_use]
    pub fn missing_required(&self, responses: &FieldResponses) -> Vec<PlanFieldId> {
        self.fields
            .iter()
            .filter(|field| field.is_required && field.kind.takes_input())
            .filter(|field| {
                !responses
                    .get(&field.id)
                    .is_some_and(FieldValue::is_present)
            })
            .map(|field| field.id)
            .collect()
    }

    /// All problems with the responses, in field order.
    #[must_use]
    pub fn validate(&self, responses: &FieldResponses) -> Vec<FieldViolation> {
        let missing = self.missing_required(responses);
        let mut violations = Vec::new();

        for field in &self.fields {
            if missing.contains(&field.id) {
                violations.push(FieldViolation::Missing { field_id: field.id });
                continue;
            }
            let Some(value) = responses.get(&field.id).filter(|v| v.is_present()) else {
                continue;
            };

            match field.kind {
                FieldKind::Numeric if value.as_decimal().is_none() => {
                    violations.push(FieldViolation::NotNumeric { field_id: field.id });
                }
                FieldKind::Dropdown if !field.dropdown_options.is_empty() => {
                    if let FieldValue::Text(choice) = value {
                        if !field.dropdown_options.contains(choice) {
                            violations.push(FieldViolation::NotAnOption {
                                field_id: field.id,
                                value: choice.clone(),
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        violations
    }

    /// Union of the selections of every field at `level`, or `None` when
    /// the plan type has no such field.
    fn selected_at(&self, level: TaxonomyLevel, responses: &FieldResponses) -> Option<Vec<Uuid>> {
        let mut fields = self
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::TaxonomyMultiSelect(level))
            .peekable();
        fields.peek()?;

        Some(
            fields
                .filter_map(|f| responses.get(&f.id))
                .flat_map(|v| v.selection().iter().copied())
                .collect(),
        )
    }
}

fn text_of(response: Option<&FieldValue>) -> Option<String> {
    match response? {
        FieldValue::Text(text) => Some(text.clone()),
        FieldValue::Number(n) => Some(n.to_string()),
        FieldValue::Selection(_) => None,
    }
}

fn axis_options(taxonomy: &Taxonomy) -> Vec<FieldOption> {
    taxonomy
        .strategic_axes
        .iter()
        .map(|axis| FieldOption {
            id: axis.id.into_inner(),
            code: Some(axis.code.clone()),
            label: axis.name.clone(),
        })
        .collect()
}

fn action_options(taxonomy: &Taxonomy, axes: Option<&[Uuid]>) -> Vec<FieldOption> {
    let actions = match axes {
        Some(axes) => {
            let axes: Vec<StrategicAxisId> =
                axes.iter().copied().map(StrategicAxisId::from_uuid).collect();
            taxonomy.actions_for_axes(&axes)
        }
        None => taxonomy.actions.iter().collect(),
    };
    actions
        .into_iter()
        .map(|action| FieldOption {
            id: action.id.into_inner(),
            code: Some(action.code.clone()),
            label: action.name.clone(),
        })
        .collect()
}

fn product_options(taxonomy: &Taxonomy, actions: Option<&[Uuid]>) -> Vec<FieldOption> {
    let products = match actions {
        Some(actions) => {
            let actions: Vec<ActionId> =
                actions.iter().copied().map(ActionId::from_uuid).collect();
            taxonomy.products_for_actions(&actions)
        }
        None => taxonomy.products.iter().collect(),
    };
    products
        .into_iter()
        .map(|product| FieldOption {
            id: product.id.into_inner(),
            code: None,
            label: product.name.clone(),
        })
        .collect()
}
