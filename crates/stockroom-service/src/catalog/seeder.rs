//! Idempotent catalog seeding.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockroom_auth::RolePermissionSynchronizer;
use stockroom_core::result::AppResult;
use stockroom_core::types::PermissionId;
use stockroom_database::RbacStore;
use stockroom_entity::permission::{Ability, NewPermission};

use super::defaults::DEFAULT_ROLES;

/// Summary of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Catalog permissions present after the run, wildcard included.
    pub permissions: usize,
    /// Default roles that did not exist before the run.
    pub roles_created: Vec<String>,
}

/// Installs the permission catalog and default roles.
#[derive(Clone)]
pub struct CatalogSeeder {
    store: Arc<dyn RbacStore>,
    synchronizer: Arc<RolePermissionSynchronizer>,
    guard_name: String,
}

impl std::fmt::Debug for CatalogSeeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSeeder")
            .field("guard_name", &self.guard_name)
            .finish()
    }
}

impl CatalogSeeder {
    /// Creates a new seeder.
    pub fn new(
        store: Arc<dyn RbacStore>,
        synchronizer: Arc<RolePermissionSynchronizer>,
        guard_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            synchronizer,
            guard_name: guard_name.into(),
        }
    }

    /// Seeds the catalog. Safe to run repeatedly: existing roles keep their
    /// permissions, except `super_admin`, which is always reset to `{*}`.
    pub async fn seed(&self) -> AppResult<SeedReport> {
        let mut ids: HashMap<Ability, PermissionId> = HashMap::with_capacity(Ability::ALL.len());
        for ability in Ability::ALL {
            let new = NewPermission::new(ability.as_str(), ability.module(), self.guard_name.as_str())
                .with_description(ability.description());
            let permission = self.store.find_or_create_permission(&new).await?;
            ids.insert(*ability, permission.id);
        }
        self.store
            .find_or_create_permission(&NewPermission::wildcard(self.guard_name.as_str()))
            .await?;

        let mut report = SeedReport::default();
        for preset in DEFAULT_ROLES {
            let existing = self
                .store
                .find_role_by_name(preset.name, &self.guard_name)
                .await?;

            let role = match existing {
                Some(role) => role,
                None => {
                    let role = self.store.create_role(preset.name, &self.guard_name).await?;
                    if !role.is_super_admin() {
                        let wanted: Vec<PermissionId> = preset
                            .abilities
                            .iter()
                            .filter_map(|a| ids.get(a).copied())
                            .collect();
                        self.synchronizer.sync(&role, &wanted).await?;
                    }
                    report.roles_created.push(role.name.clone());
                    role
                }
            };

            if role.is_super_admin() {
                self.synchronizer.sync(&role, &[]).await?;
            } else {
                debug!(role = %role.name, "Default role present");
            }
        }

        report.permissions = self
            .store
            .list_permissions(Some(&self.guard_name))
            .await?
            .len();

        info!(
            guard = %self.guard_name,
            permissions = report.permissions,
            roles_created = ?report.roles_created,
            "Catalog seeded"
        );
        Ok(report)
    }
}
