//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockroom_core::types::PermissionId;

/// The reserved permission name meaning "every permission".
pub const WILDCARD_PERMISSION: &str = "*";

/// Module tag under which the wildcard permission is catalogued.
pub const WILDCARD_MODULE: &str = "system";

/// Guard scope used for all web-issued roles and permissions.
pub const DEFAULT_GUARD: &str = "web";

/// A named permission in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: PermissionId,
    /// Permission name, unique within its guard.
    pub name: String,
    /// Grouping label (e.g. `assets`, `stock_opname`).
    pub module: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Guard scope.
    pub guard_name: String,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
    /// When the permission was last renamed or described.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Check whether this is the wildcard permission.
    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD_PERMISSION
    }
}

/// Data needed to insert a new catalog permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermission {
    /// Permission name.
    pub name: String,
    /// Grouping label.
    pub module: String,
    /// Optional description.
    pub description: Option<String>,
    /// Guard scope.
    pub guard_name: String,
}

impl NewPermission {
    /// Build a new permission record in the given guard.
    pub fn new(name: impl Into<String>, module: impl Into<String>, guard_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            description: None,
            guard_name: guard_name.into(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The wildcard permission for a guard.
    pub fn wildcard(guard_name: impl Into<String>) -> Self {
        Self::new(WILDCARD_PERMISSION, WILDCARD_MODULE, guard_name)
            .with_description("Grants every permission")
    }
}
