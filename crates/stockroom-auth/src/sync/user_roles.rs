//! User -> role synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockroom_core::result::AppResult;
use stockroom_core::types::{RoleId, UserId, dedup_ids};
use stockroom_database::RbacStore;
use stockroom_entity::role::Role;
use stockroom_entity::user::User;

/// Outcome of a user role sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleSync {
    /// The synchronized user.
    pub user_id: UserId,
    /// Role names the user holds after the sync, ordered by name.
    pub roles: Vec<String>,
    /// Requested identifiers that were not stored.
    pub dropped: Vec<RoleId>,
    /// Whether `super_admin` displaced the other requested roles.
    pub exclusive: bool,
}

/// Replaces a user's role set, keeping `super_admin` exclusive.
#[derive(Clone)]
pub struct UserRoleSynchronizer {
    store: Arc<dyn RbacStore>,
}

impl std::fmt::Debug for UserRoleSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRoleSynchronizer").finish()
    }
}

impl UserRoleSynchronizer {
    /// Creates a new synchronizer.
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self { store }
    }

    /// Replaces the user's roles with the known subset of `requested`.
    ///
    /// If that subset contains `super_admin`, it becomes the only role.
    pub async fn sync(&self, user: &User, requested: &[RoleId]) -> AppResult<UserRoleSync> {
        let unique = dedup_ids(requested);
        let found: HashMap<RoleId, Role> = self
            .store
            .find_roles_by_ids(&unique)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let resolved: Vec<&Role> = unique.iter().filter_map(|id| found.get(id)).collect();
        let mut dropped: Vec<RoleId> = unique
            .iter()
            .copied()
            .filter(|id| !found.contains_key(id))
            .collect();

        if !dropped.is_empty() {
            warn!(
                user_id = %user.id,
                dropped = dropped.len(),
                "Ignoring unknown role identifiers"
            );
        }

        let super_admin = resolved.iter().find(|r| r.is_super_admin());
        let exclusive = super_admin.is_some() && resolved.len() > 1;

        let keep: Vec<RoleId> = match super_admin {
            Some(role) => {
                if exclusive {
                    warn!(
                        user_id = %user.id,
                        discarded = resolved.len() - 1,
                        "super_admin is exclusive, discarding other requested roles"
                    );
                    dropped.extend(resolved.iter().map(|r| r.id).filter(|id| *id != role.id));
                }
                vec![role.id]
            }
            None => resolved.iter().map(|r| r.id).collect(),
        };

        self.store.replace_user_roles(user.id, &keep).await?;

        let roles: Vec<String> = self
            .store
            .user_roles(user.id)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();

        info!(user_id = %user.id, roles = ?roles, "User roles synchronized");

        Ok(UserRoleSync {
            user_id: user.id,
            roles,
            dropped,
            exclusive,
        })
    }
}
