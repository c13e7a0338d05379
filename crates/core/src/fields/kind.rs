//! Field kinds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::context::ActorContext;
use crate::fields::error::FieldError;
use crate::taxonomy::TaxonomyLevel;

/// What a plan field is and how it is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum FieldKind {
    /// Read-only value derived from the acting user.
    Automatic,
    /// Grouping header without a value.
    SectionHeader,
    /// Multi-select over one taxonomy level.
    TaxonomyMultiSelect(TaxonomyLevel),
    /// Decimal number.
    Numeric,
    /// Single-line text.
    ShortText,
    /// Multi-line text.
    LongText,
    /// One value out of the configured options.
    Dropdown,
    /// Uploaded file reference.
    File,
}

impl FieldKind {
    /// Parses a stored type tag.
    ///
    /// A plain `multiselect` tag takes its level from the field name.
    pub fn parse(tag: &str, field_name: &str) -> Result<Self, FieldError> {
        let kind = match tag.trim().to_lowercase().as_str() {
            "automatic" | "auto" => Self::Automatic,
            "section" | "section_header" => Self::SectionHeader,
            "multiselect_axes" => Self::TaxonomyMultiSelect(TaxonomyLevel::StrategicAxis),
            "multiselect_actions" => Self::TaxonomyMultiSelect(TaxonomyLevel::Action),
            "multiselect_products" => Self::TaxonomyMultiSelect(TaxonomyLevel::Product),
            "multiselect" => Self::TaxonomyMultiSelect(selection_level(field_name)?),
            "numeric" | "number" => Self::Numeric,
            "short_text" | "text" => Self::ShortText,
            "long_text" | "textarea" => Self::LongText,
            "dropdown" | "select" => Self::Dropdown,
            "file" => Self::File,
            _ => {
                return Err(FieldError::UnknownKind {
                    tag: tag.to_string(),
                    field_name: field_name.to_string(),
                });
            }
        };
        Ok(kind)
    }

    /// The canonical storage tag.
    #[must_use]
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::SectionHeader => "section",
            Self::TaxonomyMultiSelect(TaxonomyLevel::StrategicAxis) => "multiselect_axes",
            Self::TaxonomyMultiSelect(TaxonomyLevel::Action) => "multiselect_actions",
            Self::TaxonomyMultiSelect(TaxonomyLevel::Product) => "multiselect_products",
            Self::Numeric => "numeric",
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::Dropdown => "dropdown",
            Self::File => "file",
        }
    }

    /// Returns true if the user provides a value for this kind.
    #[must_use]
    pub fn takes_input(&self) -> bool {
        !matches!(self, Self::Automatic | Self::SectionHeader)
    }
}

fn selection_level(field_name: &str) -> Result<TaxonomyLevel, FieldError> {
    let name = field_name.to_lowercase();
    if name.contains("eje") || name.contains("axis") || name.contains("axes") {
        Ok(TaxonomyLevel::StrategicAxis)
    } else if name.contains("accion") || name.contains("acción") || name.contains("action") {
        Ok(TaxonomyLevel::Action)
    } else if name.contains("producto") || name.contains("product") {
        Ok(TaxonomyLevel::Product)
    } else {
        Err(FieldError::UnknownSelectionLevel {
            field_name: field_name.to_string(),
        })
    }
}

/// Where an automatic field takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedSource {
    /// The manager's full name.
    ManagerName,
    /// The manager's email.
    ManagerEmail,
    /// Campus of the manager.
    CampusName,
    /// Faculty of the manager.
    FacultyName,
    /// Academic program of the manager.
    ProgramName,
    /// Total hours allocated to the manager.
    AllocatedHours,
    /// Today's date.
    CurrentDate,
}

impl DerivedSource {
    /// Picks the source from an automatic field's name.
    ///
    /// More specific keywords are checked before the generic "name".
    #[must_use]
    pub fn for_field(field_name: &str) -> Option<Self> {
        let name = field_name.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| name.contains(k));

        if has(&["email", "correo"]) {
            Some(Self::ManagerEmail)
        } else if has(&["campus", "sede"]) {
            Some(Self::CampusName)
        } else if has(&["facultad", "faculty"]) {
            Some(Self::FacultyName)
        } else if has(&["programa", "program"]) {
            Some(Self::ProgramName)
        } else if has(&["hora", "hour"]) {
            Some(Self::AllocatedHours)
        } else if has(&["fecha", "date"]) {
            Some(Self::CurrentDate)
        } else if has(&["nombre", "name", "gestor", "manager"]) {
            Some(Self::ManagerName)
        } else {
            None
        }
    }

    /// Reads the value from the actor context.
    #[must_use]
    pub fn value(&self, ctx: &ActorContext, today: NaiveDate) -> Option<String> {
        let profile = &ctx.profile;
        match self {
            Self::ManagerName => Some(profile.full_name.clone()).filter(|n| !n.is_empty()),
            Self::ManagerEmail => profile.email.clone(),
            Self::CampusName => profile.campus_name.clone(),
            Self::FacultyName => profile.faculty_name.clone(),
            Self::ProgramName => profile.program_name.clone(),
            Self::AllocatedHours => profile.allocated_hours.map(|h| h.normalize().to_string()),
            Self::CurrentDate => Some(today.format("%Y-%m-%d").to_string()),
        }
    }
}
