//! RBAC enforcement: loads an actor's grants and checks named permissions.

use std::sync::Arc;

use tracing::debug;

use stockroom_core::error::AppError;
use stockroom_core::result::AppResult;
use stockroom_core::types::UserId;
use stockroom_database::RbacStore;
use stockroom_entity::permission::Ability;

use super::grants::Grants;

/// Message carried by every access denial. It never names the missing
/// permission or role.
pub const DENIED_MESSAGE: &str = "This action is unauthorized.";

/// Enforces named-permission checks against committed role assignments.
#[derive(Clone)]
pub struct RbacEnforcer {
    /// Storage collaborator.
    store: Arc<dyn RbacStore>,
}

impl std::fmt::Debug for RbacEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacEnforcer").finish()
    }
}

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self { store }
    }

    /// Loads the actor's current grants.
    ///
    /// An unknown actor gets empty grants rather than an error.
    pub async fn grants_for(&self, user_id: UserId) -> AppResult<Grants> {
        if self.store.find_user(user_id).await?.is_none() {
            debug!(user_id = %user_id, "Unknown actor, using empty grants");
            return Ok(Grants::empty(user_id));
        }

        let roles = self.store.user_roles(user_id).await?;
        let permissions = self.store.user_permission_names(user_id).await?;
        Ok(Grants::new(
            user_id,
            roles.into_iter().map(|r| r.name),
            permissions,
        ))
    }

    /// Returns `Ok(())` if the grants hold the ability, otherwise an
    /// authorization error.
    pub fn require_permission(&self, grants: &Grants, ability: Ability) -> AppResult<()> {
        if grants.has(ability) {
            Ok(())
        } else {
            debug!(user_id = %grants.user_id, ability = %ability, "Permission check failed");
            Err(AppError::authorization(DENIED_MESSAGE))
        }
    }

    /// Loads the actor's grants and checks the permission name.
    pub async fn user_has_permission(&self, user_id: UserId, name: &str) -> AppResult<bool> {
        Ok(self.grants_for(user_id).await?.has_permission(name))
    }
}
