//! Field definitions, responses and resolved specs.

use std::collections::HashMap;
use std::str::FromStr;

use gestor_shared::types::{PlanFieldId, PlanTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::error::FieldError;
use crate::fields::kind::{DerivedSource, FieldKind};
use crate::taxonomy::TaxonomyLevel;

/// One configured field of a plan type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanField {
    /// Field ID.
    pub id: PlanFieldId,
    /// Owning plan type.
    pub plan_type_id: PlanTypeId,
    /// Label shown to the user.
    pub field_name: String,
    /// Parsed field kind.
    pub kind: FieldKind,
    /// Whether submission needs a value.
    pub is_required: bool,
    /// Sort key, ascending.
    pub order: i32,
    /// Options for dropdown fields.
    pub dropdown_options: Vec<String>,
}

/// A field definition as stored, with its type still a raw tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlanField {
    /// Field ID.
    pub id: PlanFieldId,
    /// Owning plan type.
    pub plan_type_id: PlanTypeId,
    /// Label shown to the user.
    pub field_name: String,
    /// Stored type tag.
    pub field_type: String,
    /// Whether submission needs a value.
    pub is_required: bool,
    /// Sort key, ascending.
    pub order: i32,
    /// Options for dropdown fields.
    pub dropdown_options: Vec<String>,
}

impl TryFrom<StoredPlanField> for PlanField {
    type Error = FieldError;

    fn try_from(stored: StoredPlanField) -> Result<Self, Self::Error> {
        let kind = FieldKind::parse(&stored.field_type, &stored.field_name)?;
        Ok(Self {
            id: stored.id,
            plan_type_id: stored.plan_type_id,
            field_name: stored.field_name,
            kind,
            is_required: stored.is_required,
            order: stored.order,
            dropdown_options: stored.dropdown_options,
        })
    }
}

impl From<&PlanField> for StoredPlanField {
    fn from(field: &PlanField) -> Self {
        Self {
            id: field.id,
            plan_type_id: field.plan_type_id,
            field_name: field.field_name.clone(),
            field_type: field.kind.as_tag().to_string(),
            is_required: field.is_required,
            order: field.order,
            dropdown_options: field.dropdown_options.clone(),
        }
    }
}

/// A response to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Text, dropdown choice or file URL.
    Text(String),
    /// Numeric input.
    Number(Decimal),
    /// Selected taxonomy element ids.
    Selection(Vec<Uuid>),
}

impl FieldValue {
    /// A value is present unless it is an empty string or empty list.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Number(_) => true,
            Self::Selection(ids) => !ids.is_empty(),
        }
    }

    /// Reads the value as a decimal, if it is one.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => Decimal::from_str(text.trim()).ok(),
            Self::Selection(_) => None,
        }
    }

    /// Selected ids, empty for non-selection values.
    #[must_use]
    pub fn selection(&self) -> &[Uuid] {
        match self {
            Self::Selection(ids) => ids,
            _ => &[],
        }
    }
}

/// Responses of one plan keyed by field.
pub type FieldResponses = HashMap<PlanFieldId, FieldValue>;

/// A selectable taxonomy element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Element id.
    pub id: Uuid,
    /// Institutional code, when the level has one.
    pub code: Option<String>,
    /// Display label.
    pub label: String,
}

/// How a resolved field is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum FieldInput {
    /// Read-only derived value.
    Derived {
        /// Where the value came from; `None` when the name matched nothing.
        source: Option<DerivedSource>,
        /// The value, empty when unavailable.
        value: String,
    },
    /// Grouping header.
    Section,
    /// Taxonomy multi-select with options narrowed by the parent selection.
    MultiSelect {
        /// Level being selected.
        level: TaxonomyLevel,
        /// Options available now.
        options: Vec<FieldOption>,
        /// Current selection restricted to `options`.
        selected: Vec<Uuid>,
    },
    /// Decimal input.
    Numeric {
        /// Current value.
        value: Option<Decimal>,
    },
    /// Single-line text.
    ShortText {
        /// Current value.
        value: String,
    },
    /// Multi-line text.
    LongText {
        /// Current value.
        value: String,
    },
    /// Fixed options.
    Dropdown {
        /// Configured options.
        options: Vec<String>,
        /// Current choice.
        value: Option<String>,
    },
    /// File upload.
    File {
        /// URL of the uploaded file.
        url: Option<String>,
    },
}

/// A field ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field ID.
    pub field_id: PlanFieldId,
    /// Label.
    pub label: String,
    /// Whether submission needs a value.
    pub required: bool,
    /// Sort key.
    pub order: i32,
    /// Rendering and current value.
    pub input: FieldInput,
}

/// A problem found in a set of responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum FieldViolation {
    /// Required field without a value.
    Missing {
        /// The field.
        field_id: PlanFieldId,
    },
    /// Numeric field holding something else.
    NotNumeric {
        /// The field.
        field_id: PlanFieldId,
    },
    /// Dropdown value outside the configured options.
    NotAnOption {
        /// The field.
        field_id: PlanFieldId,
        /// The rejected value.
        value: String,
    },
}

impl FieldViolation {
    /// The field the violation refers to.
    #[must_use]
    pub fn field_id(&self) -> PlanFieldId {
        match self {
            Self::Missing { field_id }
            | Self::NotNumeric { field_id }
            | Self::NotAnOption { field_id, .. } => *field_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_presence() {
        assert!(!FieldValue::Text(String::new()).is_present());
        assert!(FieldValue::Text(" ".into()).is_present());
        assert!(FieldValue::Number(Decimal::ZERO).is_present());
        assert!(!FieldValue::Selection(vec![]).is_present());
        assert!(FieldValue::Selection(vec![Uuid::nil()]).is_present());
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(FieldValue::Number(dec!(3.5)).as_decimal(), Some(dec!(3.5)));
        assert_eq!(FieldValue::Text(" 12 ".into()).as_decimal(), Some(dec!(12)));
        assert_eq!(FieldValue::Text("twelve".into()).as_decimal(), None);
        assert_eq!(FieldValue::Selection(vec![]).as_decimal(), None);
    }

    #[test]
    fn test_value_json_shape() {
        let json = serde_json::to_value(FieldValue::Text("Virtual".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "value": "Virtual" }));

        let back: FieldValue =
            serde_json::from_value(serde_json::json!({ "type": "selection", "value": [] }))
                .unwrap();
        assert_eq!(back, FieldValue::Selection(vec![]));
    }
}
