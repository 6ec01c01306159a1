//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockroom_core::types::RoleId;

/// The reserved role whose only permission is the wildcard and which must be
/// a holder's sole role.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Role name, unique within its guard.
    pub name: String,
    /// Guard scope.
    pub guard_name: String,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last renamed.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Check if this is the reserved super-admin role (exact, case-sensitive).
    pub fn is_super_admin(&self) -> bool {
        is_super_admin_name(&self.name)
    }
}

/// Check whether a role name is the reserved super-admin name.
pub fn is_super_admin_name(name: &str) -> bool {
    name == SUPER_ADMIN_ROLE
}
