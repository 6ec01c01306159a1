//! In-memory role/permission store using a Tokio `RwLock`.
//!
//! Suitable for single-process tooling and tests. Association tables are kept
//! as row lists, so duplicate rows can exist exactly as they can in the
//! PostgreSQL schema.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use stockroom_core::error::AppError;
use stockroom_core::result::AppResult;
use stockroom_core::types::{PermissionId, RoleId, UserId};
use stockroom_entity::permission::{NewPermission, Permission};
use stockroom_entity::role::Role;
use stockroom_entity::user::User;

use super::RbacStore;

/// Internal state for the memory-based store.
#[derive(Debug, Default)]
struct InnerState {
    /// Last issued key, shared by all tables.
    sequence: i64,
    permissions: BTreeMap<PermissionId, Permission>,
    roles: BTreeMap<RoleId, Role>,
    users: BTreeMap<UserId, User>,
    /// `(role, permission)` rows in insertion order.
    role_permissions: Vec<(RoleId, PermissionId)>,
    /// `(user, role)` rows in insertion order.
    user_roles: Vec<(UserId, RoleId)>,
}

impl InnerState {
    fn next_key(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn permission_by_name(&self, name: &str, guard_name: &str) -> Option<&Permission> {
        self.permissions
            .values()
            .find(|p| p.name == name && p.guard_name == guard_name)
    }

    fn role_by_name(&self, name: &str, guard_name: &str) -> Option<&Role> {
        self.roles
            .values()
            .find(|r| r.name == name && r.guard_name == guard_name)
    }

    fn insert_permission(&mut self, new: &NewPermission) -> Permission {
        let id = PermissionId(self.next_key());
        let now = Utc::now();
        let permission = Permission {
            id,
            name: new.name.clone(),
            module: new.module.clone(),
            description: new.description.clone(),
            guard_name: new.guard_name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.permissions.insert(id, permission.clone());
        permission
    }

    fn sorted_by_name<T: Clone>(items: impl Iterator<Item = T>, name: impl Fn(&T) -> String) -> Vec<T> {
        let mut items: Vec<T> = items.collect();
        items.sort_by_key(|item| name(item));
        items
    }
}

/// In-memory [`RbacStore`] protected by a Tokio `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct MemoryRbacStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryRbacStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user. Users are owned by the wider application, so this
    /// exists only on the in-memory store.
    pub async fn insert_user(&self, name: &str, email: &str) -> User {
        let mut state = self.state.write().await;
        let id = UserId(state.next_key());
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        user
    }

    /// Appends a raw association row without any normalization.
    ///
    /// Reproduces the duplicate rows left behind by legacy imports.
    pub async fn push_role_permission_row(&self, role_id: RoleId, permission_id: PermissionId) {
        let mut state = self.state.write().await;
        state.role_permissions.push((role_id, permission_id));
    }
}

#[async_trait]
impl RbacStore for MemoryRbacStore {
    async fn list_permissions(&self, guard_name: Option<&str>) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let mut permissions: Vec<Permission> = state
            .permissions
            .values()
            .filter(|p| guard_name.is_none_or(|g| p.guard_name == g))
            .cloned()
            .collect();
        permissions.sort_by(|a, b| (&a.module, &a.name).cmp(&(&b.module, &b.name)));
        Ok(permissions)
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        let state = self.state.read().await;
        Ok(state.permissions.get(&id).cloned())
    }

    async fn find_permissions_by_ids(&self, ids: &[PermissionId]) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let wanted: BTreeSet<PermissionId> = ids.iter().copied().collect();
        Ok(wanted
            .iter()
            .filter_map(|id| state.permissions.get(id).cloned())
            .collect())
    }

    async fn find_permissions_by_names(
        &self,
        names: &[String],
        guard_name: &str,
    ) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        Ok(state
            .permissions
            .values()
            .filter(|p| p.guard_name == guard_name && wanted.contains(p.name.as_str()))
            .cloned()
            .collect())
    }

    async fn create_permission(&self, new: &NewPermission) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        if state.permission_by_name(&new.name, &new.guard_name).is_some() {
            return Err(AppError::conflict(format!(
                "Permission '{}' already exists",
                new.name
            )));
        }
        Ok(state.insert_permission(new))
    }

    async fn find_or_create_permission(&self, new: &NewPermission) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.permission_by_name(&new.name, &new.guard_name) {
            return Ok(existing.clone());
        }
        let permission = state.insert_permission(new);
        debug!(name = %permission.name, id = %permission.id, "Permission created");
        Ok(permission)
    }

    async fn update_permission(
        &self,
        id: PermissionId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        let guard_name = state
            .permissions
            .get(&id)
            .map(|p| p.guard_name.clone())
            .ok_or_else(|| AppError::not_found(format!("Permission {id} not found")))?;

        if state
            .permission_by_name(name, &guard_name)
            .is_some_and(|other| other.id != id)
        {
            return Err(AppError::conflict(format!("Permission '{name}' already exists")));
        }

        let permission = state
            .permissions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Permission {id} not found")))?;
        permission.name = name.to_string();
        permission.description = description.map(str::to_string);
        permission.updated_at = Utc::now();
        Ok(permission.clone())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(InnerState::sorted_by_name(
            state.roles.values().cloned(),
            |r: &Role| r.name.clone(),
        ))
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str, guard_name: &str) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state.role_by_name(name, guard_name).cloned())
    }

    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let wanted: BTreeSet<RoleId> = ids.iter().copied().collect();
        Ok(wanted
            .iter()
            .filter_map(|id| state.roles.get(id).cloned())
            .collect())
    }

    async fn create_role(&self, name: &str, guard_name: &str) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.role_by_name(name, guard_name).is_some() {
            return Err(AppError::conflict(format!("Role '{name}' already exists")));
        }
        let id = RoleId(state.next_key());
        let now = Utc::now();
        let role = Role {
            id,
            name: name.to_string(),
            guard_name: guard_name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn rename_role(&self, id: RoleId, name: &str) -> AppResult<Role> {
        let mut state = self.state.write().await;
        let guard_name = state
            .roles
            .get(&id)
            .map(|r| r.guard_name.clone())
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;

        if state
            .role_by_name(name, &guard_name)
            .is_some_and(|other| other.id != id)
        {
            return Err(AppError::conflict(format!("Role '{name}' already exists")));
        }

        let role = state
            .roles
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;
        role.name = name.to_string();
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.roles.remove(&id).is_none() {
            return Ok(false);
        }
        state.role_permissions.retain(|(role_id, _)| *role_id != id);
        state.user_roles.retain(|(_, role_id)| *role_id != id);
        Ok(true)
    }

    async fn role_permission_rows(&self, role_id: RoleId) -> AppResult<Vec<PermissionId>> {
        let state = self.state.read().await;
        Ok(state
            .role_permissions
            .iter()
            .filter(|(r, _)| *r == role_id)
            .map(|(_, p)| *p)
            .collect())
    }

    async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let ids: BTreeSet<PermissionId> = state
            .role_permissions
            .iter()
            .filter(|(r, _)| *r == role_id)
            .map(|(_, p)| *p)
            .collect();
        Ok(InnerState::sorted_by_name(
            ids.iter().filter_map(|id| state.permissions.get(id).cloned()),
            |p: &Permission| p.name.clone(),
        ))
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.role_permissions.retain(|(r, _)| *r != role_id);
        state
            .role_permissions
            .extend(permission_ids.iter().map(|p| (role_id, *p)));
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let ids: BTreeSet<RoleId> = state
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, r)| *r)
            .collect();
        Ok(InnerState::sorted_by_name(
            ids.iter().filter_map(|id| state.roles.get(id).cloned()),
            |r: &Role| r.name.clone(),
        ))
    }

    async fn replace_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.user_roles.retain(|(u, _)| *u != user_id);
        let mut seen = HashSet::new();
        for role_id in role_ids {
            if seen.insert(*role_id) {
                state.user_roles.push((user_id, *role_id));
            }
        }
        Ok(())
    }

    async fn user_permission_names(&self, user_id: UserId) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let role_ids: HashSet<RoleId> = state
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, r)| *r)
            .collect();
        let names: BTreeSet<String> = state
            .role_permissions
            .iter()
            .filter(|(r, _)| role_ids.contains(r))
            .filter_map(|(_, p)| state.permissions.get(p))
            .map(|p| p.name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let store = MemoryRbacStore::new();
        let first = store
            .find_or_create_permission(&NewPermission::wildcard("web"))
            .await
            .unwrap();
        let second = store
            .find_or_create_permission(&NewPermission::wildcard("web"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_permissions(None).await.unwrap().len(), 1);

        let other_guard = store
            .find_or_create_permission(&NewPermission::wildcard("api"))
            .await
            .unwrap();
        assert_ne!(first.id, other_guard.id);
    }

    #[tokio::test]
    async fn test_duplicate_names_conflict() {
        let store = MemoryRbacStore::new();
        store.create_role("kpa", "web").await.unwrap();
        let err = store.create_role("kpa", "web").await.unwrap_err();
        assert_eq!(err.kind, stockroom_core::error::ErrorKind::Conflict);
        assert!(store.create_role("kpa", "api").await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_role_permissions_is_full_replace() {
        let store = MemoryRbacStore::new();
        let role = store.create_role("kpa", "web").await.unwrap();
        let a = store
            .create_permission(&NewPermission::new("view-reports", "reports", "web"))
            .await
            .unwrap();
        let b = store
            .create_permission(&NewPermission::new("approval-l3", "approval", "web"))
            .await
            .unwrap();

        store.replace_role_permissions(role.id, &[a.id, b.id]).await.unwrap();
        store.replace_role_permissions(role.id, &[b.id]).await.unwrap();

        assert_eq!(store.role_permission_rows(role.id).await.unwrap(), vec![b.id]);
    }

    #[tokio::test]
    async fn test_raw_rows_expose_duplicates() {
        let store = MemoryRbacStore::new();
        let role = store.create_role("operator", "web").await.unwrap();
        let perm = store
            .create_permission(&NewPermission::new("assets.view", "assets", "web"))
            .await
            .unwrap();
        store.push_role_permission_row(role.id, perm.id).await;
        store.push_role_permission_row(role.id, perm.id).await;

        assert_eq!(store.role_permission_rows(role.id).await.unwrap().len(), 2);
        assert_eq!(store.role_permissions(role.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_role_cascades() {
        let store = MemoryRbacStore::new();
        let user = store.insert_user("Siti", "siti@example.test").await;
        let role = store.create_role("pegawai", "web").await.unwrap();
        let perm = store
            .create_permission(&NewPermission::new("atk.requests.create", "atk_requests", "web"))
            .await
            .unwrap();
        store.replace_role_permissions(role.id, &[perm.id]).await.unwrap();
        store.replace_user_roles(user.id, &[role.id]).await.unwrap();
        assert_eq!(
            store.user_permission_names(user.id).await.unwrap(),
            vec!["atk.requests.create".to_string()]
        );

        assert!(store.delete_role(role.id).await.unwrap());
        assert!(store.user_roles(user.id).await.unwrap().is_empty());
        assert!(store.user_permission_names(user.id).await.unwrap().is_empty());
        assert!(!store.delete_role(role.id).await.unwrap());
    }
}
