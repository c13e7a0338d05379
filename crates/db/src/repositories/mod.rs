//! Repository implementations of the core collaborator contracts.
//!
//! [`DbStore`] implements every store trait from `gestor_core::ports` over
//! one connection pool, split by aggregate:
//!
//! - `taxonomy` - Strategic axes, actions and products
//! - `plan` - Plan types, fields, plans, responses and assignments
//! - `report` - Manager reports and per-product progress rows

pub mod plan;
pub mod report;
pub mod taxonomy;

use chrono::{DateTime, Utc};
use sea_orm::prelude::{DateTimeWithTimeZone, Json};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use gestor_core::ports::StoreError;

/// PostgreSQL-backed store.
#[derive(Debug)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    /// Creates a new store over a connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Maps a database error into the core store error.
///
/// Constraint violations become conflicts; everything else is a backend
/// failure.
pub(crate) fn store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg)) => {
            StoreError::Conflict(msg)
        }
        _ => match err {
            DbErr::RecordNotFound(what) => StoreError::NotFound {
                entity: "record",
                id: what,
            },
            other => StoreError::Backend(other.to_string()),
        },
    }
}

/// Reads a JSONB array of strings.
pub(crate) fn json_strings(value: &Json, column: &'static str) -> Result<Vec<String>, StoreError> {
    serde_json::from_value(value.clone())
        .map_err(|e| StoreError::Backend(format!("malformed {column}: {e}")))
}

/// Writes a list of strings as a JSONB array.
pub(crate) fn strings_json(values: &[String]) -> Json {
    Json::from(values.to_vec())
}

pub(crate) fn to_utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}
