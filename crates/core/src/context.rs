//! Actor identity passed explicitly into every operation.
//!
//! Role resolution happens outside this crate; callers hand in an
//! [`ActorContext`] describing who is acting and with which role.

use gestor_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lifecycle::LifecycleError;

/// User role in the institution.
///
/// Roles are ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Owns plans and reports, allocates hours and records progress.
    Manager = 0,
    /// Reviews submitted plans and reports.
    Coordinator = 1,
    /// Full access, including review.
    Administrator = 2,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manager" | "gestor" => Some(Self::Manager),
            "coordinator" | "coordinador" => Some(Self::Coordinator),
            "administrator" | "admin" | "administrador" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Coordinator => "coordinator",
            Self::Administrator => "administrator",
        }
    }

    /// Returns true if the role may approve, reject or review.
    #[must_use]
    pub fn is_reviewer(&self) -> bool {
        *self >= Self::Coordinator
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile and organizational data of the acting user.
///
/// Automatic plan fields read their values from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorProfile {
    /// Full display name.
    pub full_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Campus the user belongs to.
    pub campus_name: Option<String>,
    /// Faculty the user belongs to.
    pub faculty_name: Option<String>,
    /// Academic program the user belongs to.
    pub program_name: Option<String>,
    /// Total hours the manager may allocate across a plan.
    pub allocated_hours: Option<Decimal>,
}

/// The acting user for a single operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// Who is acting.
    pub user_id: UserId,
    /// With which role.
    pub role: UserRole,
    /// Profile used for derived values.
    pub profile: ActorProfile,
}

impl ActorContext {
    /// Creates a context with an empty profile.
    #[must_use]
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            profile: ActorProfile::default(),
        }
    }

    /// Replaces the profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ActorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Fails unless the actor holds the Coordinator or Administrator role.
    pub fn ensure_reviewer(&self, action: &'static str) -> Result<(), LifecycleError> {
        if self.role.is_reviewer() {
            Ok(())
        } else {
            Err(LifecycleError::InsufficientRole {
                role: self.role,
                action,
            })
        }
    }

    /// Fails unless the actor is the given owner.
    pub fn ensure_owner(&self, owner: UserId) -> Result<(), LifecycleError> {
        if self.user_id == owner {
            Ok(())
        } else {
            Err(LifecycleError::NotOwner {
                user_id: self.user_id,
            })
        }
    }
}
