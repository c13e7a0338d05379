//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ProductId` where an `ActionId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user (manager, coordinator, administrator).");
typed_id!(StrategicAxisId, "Unique identifier for a strategic axis.");
typed_id!(ActionId, "Unique identifier for an action under a strategic axis.");
typed_id!(ProductId, "Unique identifier for a product under an action.");
typed_id!(PlanTypeId, "Unique identifier for a plan type.");
typed_id!(PlanFieldId, "Unique identifier for a configurable plan field.");
typed_id!(PlanId, "Unique identifier for a work plan.");
typed_id!(AssignmentId, "Unique identifier for an hour assignment.");
typed_id!(ReportPeriodId, "Unique identifier for a reporting period.");
typed_id!(ManagerReportId, "Unique identifier for a manager report.");
typed_id!(
    ProgressReportId,
    "Unique identifier for a per-product progress report."
);

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
