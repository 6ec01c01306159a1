//! Permission catalog administration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use stockroom_auth::AccessResolver;
use stockroom_core::error::AppError;
use stockroom_core::result::AppResult;
use stockroom_core::types::PermissionId;
use stockroom_database::RbacStore;
use stockroom_entity::permission::{NewPermission, Permission, WILDCARD_PERMISSION};
use stockroom_entity::resource::{Action, ResourceKind};

use crate::context::RequestContext;

/// Request to add a permission to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    /// Permission name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Grouping label.
    #[validate(length(min = 1, max = 50))]
    pub module: String,
    /// Optional description.
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

/// Request to rename or re-describe a permission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePermissionRequest {
    /// New permission name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// New description; `None` clears it.
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

/// Lists and edits catalog permissions.
#[derive(Clone)]
pub struct PermissionCatalogService {
    /// Storage collaborator.
    store: Arc<dyn RbacStore>,
    /// Access resolver.
    access: Arc<AccessResolver>,
    /// Guard scope of the catalog.
    guard_name: String,
}

impl std::fmt::Debug for PermissionCatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCatalogService")
            .field("guard_name", &self.guard_name)
            .finish()
    }
}

impl PermissionCatalogService {
    /// Creates a new catalog service.
    pub fn new(
        store: Arc<dyn RbacStore>,
        access: Arc<AccessResolver>,
        guard_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            access,
            guard_name: guard_name.into(),
        }
    }

    /// Lists catalog permissions, optionally for one module.
    pub async fn list(&self, ctx: &RequestContext, module: Option<&str>) -> AppResult<Vec<Permission>> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::ViewAny, None)
            .await?;
        let permissions = self.store.list_permissions(Some(&self.guard_name)).await?;
        Ok(match module {
            Some(module) => permissions
                .into_iter()
                .filter(|p| p.module == module)
                .collect(),
            None => permissions,
        })
    }

    /// Lists catalog permissions grouped by module.
    pub async fn grouped_by_module(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<BTreeMap<String, Vec<Permission>>> {
        let mut grouped: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in self.list(ctx, None).await? {
            grouped
                .entry(permission.module.clone())
                .or_default()
                .push(permission);
        }
        Ok(grouped)
    }

    /// Adds a permission. The wildcard name is reserved.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreatePermissionRequest,
    ) -> AppResult<Permission> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::Create, None)
            .await?;
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid permission: {e}")))?;

        let name = required(&req.name, "Permission name")?;
        let module = required(&req.module, "Module")?;
        reject_wildcard_name(name)?;

        let mut new = NewPermission::new(name, module, self.guard_name.as_str());
        new.description = req.description;
        let permission = self.store.create_permission(&new).await?;

        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            permission = %permission.name,
            module = %permission.module,
            "Permission created"
        );
        Ok(permission)
    }

    /// Renames a permission and replaces its description. The wildcard
    /// cannot be edited.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: PermissionId,
        req: UpdatePermissionRequest,
    ) -> AppResult<Permission> {
        ctx.authorize(&self.access, ResourceKind::Role, Action::Update, None)
            .await?;
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid permission: {e}")))?;

        let current = self
            .store
            .find_permission(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Permission {id} not found")))?;
        if current.is_wildcard() {
            return Err(AppError::conflict("The wildcard permission cannot be edited"));
        }

        let name = required(&req.name, "Permission name")?;
        reject_wildcard_name(name)?;

        let updated = self
            .store
            .update_permission(id, name, req.description.as_deref())
            .await?;

        info!(
            request_id = %ctx.request_id,
            actor = %ctx.username,
            from = %current.name,
            to = %updated.name,
            "Permission updated"
        );
        Ok(updated)
    }
}

fn required<'a>(raw: &'a str, field: &str) -> AppResult<&'a str> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be blank")));
    }
    Ok(value)
}

fn reject_wildcard_name(name: &str) -> AppResult<()> {
    if name == WILDCARD_PERMISSION {
        return Err(AppError::conflict(format!(
            "The permission name '{WILDCARD_PERMISSION}' is reserved"
        )));
    }
    Ok(())
}
