//! Field configuration errors.

use thiserror::Error;

/// Errors raised while reading field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The stored type tag is not a known field kind.
    #[error("Unknown field type {tag:?} for field {field_name:?}")]
    UnknownKind {
        /// The stored tag.
        tag: String,
        /// The field carrying it.
        field_name: String,
    },

    /// A plain `multiselect` field whose name does not reveal its level.
    #[error("Cannot tell which taxonomy level field {field_name:?} selects")]
    UnknownSelectionLevel {
        /// The field name.
        field_name: String,
    },
}

impl FieldError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKind { .. } => "UNKNOWN_FIELD_KIND",
            Self::UnknownSelectionLevel { .. } => "UNKNOWN_SELECTION_LEVEL",
        }
    }
}
