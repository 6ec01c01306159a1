//! Access control configuration.

use serde::{Deserialize, Serialize};

/// Role/permission catalog settings.
///
/// The wildcard permission `*` and the `super_admin` role name are reserved
/// and intentionally not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Guard scope that new roles and permissions are created in.
    #[serde(default = "default_guard_name")]
    pub guard_name: String,
    /// Whether `migrate` seeds the default catalog afterwards.
    #[serde(default = "default_true")]
    pub seed_on_migrate: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            guard_name: default_guard_name(),
            seed_on_migrate: true,
        }
    }
}

fn default_guard_name() -> String {
    "web".to_string()
}

fn default_true() -> bool {
    true
}
