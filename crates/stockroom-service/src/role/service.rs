//! Role administration: create, rename, delete and permission sync.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use stockroom_auth::{AccessResolver, RolePermissionSync, RolePermissionSynchronizer};
use stockroom_core::error::AppError;
use stockroom_core::result::AppResult;
use stockroom_core::types::{PermissionId, RoleId};
use stockroom_database::RbacStore;
use stockroom_entity::permission::Permission;
use stockroom_entity::resource::{Action, ResourceKind};
use stockroom_entity::role::{Role, SUPER_ADMIN_ROLE, is_super_admin_name};

use crate::context::RequestContext;

/// Request to create a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    /// Role name.
    #[validate(length(min = 1, max = 100, message = "Role name must be 1-100 characters"))]
    pub name: String,
}

/// Request to rename a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRoleRequest {
    /// New role name.
    #[validate(length(min = 1, max = 100, message = "Role name must be 1-100 characters"))]
    pub name: String,
}

/// A role together with its permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetail {
    /// The role.
    pub role: Role,
    /// Distinct permissions, ordered by name.
    pub permissions: Vec<Permission>,
}

/// Manages roles and their permission sets.
#[derive(Clone)]
pub struct RoleService {
    /// Storage collaborator.
    store: Arc<dyn RbacStore>,
    /// Access resolver.
    access: Arc<AccessResolver>,
    /// Role -> permission synchronizer.
    synchronizer: Arc<RolePermissionSynchronizer>,
    /// Guard scope for new roles.
    guard_name: String,
}

impl std::fmt::Debug for RoleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleService")
            .field("guard_name", &self.guard_name)
            .finish()
    }
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(
        store: Arc<dyn RbacStore>,
        access: Arc<AccessResolver>,
        synchronizer: Arc<RolePermissionSynchronizer>,
        guard_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            access,
            synchronizer,
            guard_name: guard_name.into(),
        }
    }

    /// Lists all roles.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Role>> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::ViewAny, None)
            .await?;
        self.store.list_roles().await
    }

    /// Gets a role with its permissions.
    pub async fn get(&self, ctx: &RequestContext, id: RoleId) -> AppResult<RoleDetail> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::View, None)
            .await?;
        let role = self.require_role(id).await?;
        let permissions = self.store.role_permissions(role.id).await?;
        Ok(RoleDetail { role, permissions })
    }

    /// Finds a role by numeric ID or by name in the service guard.
    pub async fn find(&self, ctx: &RequestContext, key: &str) -> AppResult<Role> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::View, None)
            .await?;
        let found = match key.parse::<RoleId>() {
            Ok(id) => self.store.find_role(id).await?,
            Err(_) => self.store.find_role_by_name(key, &self.guard_name).await?,
        };
        found.ok_or_else(|| AppError::not_found(format!("Role '{key}' not found")))
    }

    /// Creates a role with no permissions. A newly created `super_admin`
    /// role immediately receives the wildcard.
    pub async fn create(&self, ctx: &RequestContext, req: CreateRoleRequest) -> AppResult<Role> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::Create, None)
            .await?;
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid role: {e}")))?;

        let name = role_name(&req.name)?;
        let role = self.store.create_role(name, &self.guard_name).await?;
        if role.is_super_admin() {
            self.synchronizer.sync(&role, &[]).await?;
        }

        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            role = %role.name,
            role_id = %role.id,
            "Role created"
        );
        Ok(role)
    }

    /// Renames a role. The `super_admin` role keeps its name, and no other
    /// role may take it.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        id: RoleId,
        req: RenameRoleRequest,
    ) -> AppResult<Role> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::Update, None)
            .await?;
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid role: {e}")))?;

        let role = self.require_role(id).await?;
        let name = role_name(&req.name)?;
        if role.is_super_admin() {
            return Err(AppError::conflict(format!(
                "The {SUPER_ADMIN_ROLE} role cannot be renamed"
            )));
        }
        if is_super_admin_name(name) {
            return Err(AppError::conflict(format!(
                "The role name '{SUPER_ADMIN_ROLE}' is reserved"
            )));
        }

        let renamed = self.store.rename_role(role.id, name).await?;
        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            from = %role.name,
            to = %renamed.name,
            "Role renamed"
        );
        Ok(renamed)
    }

    /// Deletes a role and its associations. The `super_admin` role cannot be
    /// deleted.
    pub async fn delete(&self, ctx: &RequestContext, id: RoleId) -> AppResult<()> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::Delete, None)
            .await?;

        let role = self.require_role(id).await?;
        if role.is_super_admin() {
            return Err(AppError::conflict(format!(
                "The {SUPER_ADMIN_ROLE} role cannot be deleted"
            )));
        }

        if !self.store.delete_role(role.id).await? {
            return Err(AppError::not_found(format!("Role {id} not found")));
        }

        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            role = %role.name,
            "Role deleted"
        );
        Ok(())
    }

    /// Replaces the role's permissions. Unknown identifiers are dropped.
    pub async fn sync_permissions(
        &self,
        ctx: &RequestContext,
        id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<RolePermissionSync> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::SyncPermissions, None)
            .await?;

        let role = self.require_role(id).await?;
        let outcome = self.synchronizer.sync(&role, permission_ids).await?;

        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            role = %role.name,
            permissions = outcome.permissions.len(),
            dropped = outcome.dropped.len(),
            "Role permissions updated"
        );
        Ok(outcome)
    }

    /// Lists the role's permissions.
    pub async fn permissions_of(&self, ctx: &RequestContext, id: RoleId) -> AppResult<Vec<Permission>> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::View, None)
            .await?;
        let role = self.require_role(id).await?;
        self.store.role_permissions(role.id).await
    }

    async fn require_role(&self, id: RoleId) -> AppResult<Role> {
        self.store
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))
    }
}

fn role_name(raw: &str) -> AppResult<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Role name must not be blank"));
    }
    Ok(name)
}
