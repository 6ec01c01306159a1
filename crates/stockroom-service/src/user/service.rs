//! User role assignment.

use std::sync::Arc;

use tracing::info;

use stockroom_auth::{AccessResolver, UserRoleSync, UserRoleSynchronizer, Verdict};
use stockroom_core::error::AppError;
use stockroom_core::result::AppResult;
use stockroom_core::types::{RoleId, UserId};
use stockroom_database::RbacStore;
use stockroom_entity::resource::{Action, ResourceKind, ResourceSnapshot};
use stockroom_entity::role::Role;
use stockroom_entity::user::User;

use crate::context::RequestContext;

/// Reads and replaces the roles assigned to users.
#[derive(Clone)]
pub struct UserRoleService {
    /// Storage collaborator.
    store: Arc<dyn RbacStore>,
    /// Access resolver.
    access: Arc<AccessResolver>,
    /// User -> role synchronizer.
    synchronizer: Arc<UserRoleSynchronizer>,
}

impl std::fmt::Debug for UserRoleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRoleService").finish()
    }
}

impl UserRoleService {
    /// Creates a new user role service.
    pub fn new(
        store: Arc<dyn RbacStore>,
        access: Arc<AccessResolver>,
        synchronizer: Arc<UserRoleSynchronizer>,
    ) -> Self {
        Self {
            store,
            access,
            synchronizer,
        }
    }

    /// Lists the user's roles. Users may always see their own.
    pub async fn roles_of(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<Vec<Role>> {
        let target = ResourceSnapshot::owned_by(user_id);
        ctx.authorize(&self.access, ResourceKind::User, Action::View, Some(&target))
            .await?;
        let user = self.require_user(user_id).await?;
        self.store.user_roles(user.id).await
    }

    /// Replaces the user's roles. Unknown identifiers are dropped and
    /// `super_admin` displaces every other role.
    pub async fn sync_roles(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> AppResult<UserRoleSync> {
        ctx.authorize(&self.access, ResourceKind::User, Action::AssignRoles, None)
            .await?;

        let user = self.require_user(user_id).await?;
        let outcome = self.synchronizer.sync(&user, role_ids).await?;

        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            user_id = %user.id,
            roles = ?outcome.roles,
            "User roles updated"
        );
        Ok(outcome)
    }

    /// Evaluates whether a user may perform an action, without raising on
    /// denial.
    pub async fn check(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> AppResult<Verdict> {
        self.access.inspect(user_id, kind, action, resource).await
    }

    async fn require_user(&self, id: UserId) -> AppResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}
