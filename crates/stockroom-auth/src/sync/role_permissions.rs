//! Role -> permission synchronization.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use stockroom_core::result::AppResult;
use stockroom_core::types::{PermissionId, RoleId, dedup_ids};
use stockroom_database::RbacStore;
use stockroom_entity::permission::{NewPermission, Permission, WILDCARD_PERMISSION};
use stockroom_entity::role::Role;

/// Outcome of a role permission sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionSync {
    /// The synchronized role.
    pub role_id: RoleId,
    /// Permission names the role holds after the sync, ordered by name.
    pub permissions: Vec<String>,
    /// Requested identifiers that were not stored.
    pub dropped: Vec<PermissionId>,
    /// Whether duplicate association rows were collapsed after the write.
    pub repaired: bool,
}

/// Replaces a role's permission set, enforcing the wildcard rule for
/// `super_admin` and keeping at most one association row per permission.
#[derive(Clone)]
pub struct RolePermissionSynchronizer {
    store: Arc<dyn RbacStore>,
}

impl std::fmt::Debug for RolePermissionSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolePermissionSynchronizer").finish()
    }
}

impl RolePermissionSynchronizer {
    /// Creates a new synchronizer.
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self { store }
    }

    /// Replaces the role's permissions with the catalog-valid subset of
    /// `requested`.
    ///
    /// For `super_admin` the request is ignored and the set becomes exactly
    /// `{*}`. Unknown identifiers and identifiers from another guard are
    /// dropped. Never fails on input; only storage errors are returned.
    pub async fn sync(&self, role: &Role, requested: &[PermissionId]) -> AppResult<RolePermissionSync> {
        if role.is_super_admin() {
            return self.sync_wildcard(role, requested).await;
        }

        let unique = dedup_ids(requested);
        let found: HashMap<PermissionId, Permission> = self
            .store
            .find_permissions_by_ids(&unique)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut names = HashSet::with_capacity(found.len());
        let mut keep = Vec::with_capacity(found.len());
        let mut dropped = Vec::new();

        for id in unique {
            match found.get(&id) {
                Some(permission) if permission.guard_name == role.guard_name => {
                    if names.insert(permission.name.as_str()) {
                        keep.push(id);
                    }
                }
                Some(permission) => {
                    debug!(
                        role = %role.name,
                        permission_id = %id,
                        guard = %permission.guard_name,
                        "Dropping permission from another guard"
                    );
                    dropped.push(id);
                }
                None => dropped.push(id),
            }
        }

        if !dropped.is_empty() {
            warn!(
                role = %role.name,
                dropped = dropped.len(),
                "Ignoring unknown permission identifiers"
            );
        }
        if names.contains(WILDCARD_PERMISSION) {
            warn!(role = %role.name, "Wildcard permission assigned to a non super_admin role");
        }

        self.store.replace_role_permissions(role.id, &keep).await?;
        let repaired = self.collapse_duplicates(role).await?;
        let permissions = self.permission_names(role.id).await?;

        info!(
            role = %role.name,
            permissions = permissions.len(),
            "Role permissions synchronized"
        );

        Ok(RolePermissionSync {
            role_id: role.id,
            permissions,
            dropped,
            repaired,
        })
    }

    async fn sync_wildcard(&self, role: &Role, requested: &[PermissionId]) -> AppResult<RolePermissionSync> {
        let wildcard = self
            .store
            .find_or_create_permission(&NewPermission::wildcard(role.guard_name.as_str()))
            .await?;

        let dropped: Vec<PermissionId> = dedup_ids(requested)
            .into_iter()
            .filter(|id| *id != wildcard.id)
            .collect();
        if !dropped.is_empty() {
            debug!(
                role = %role.name,
                ignored = dropped.len(),
                "super_admin holds only the wildcard, ignoring requested permissions"
            );
        }

        self.store
            .replace_role_permissions(role.id, &[wildcard.id])
            .await?;

        info!(role = %role.name, "super_admin permissions reset to wildcard");

        Ok(RolePermissionSync {
            role_id: role.id,
            permissions: vec![WILDCARD_PERMISSION.to_string()],
            dropped,
            repaired: false,
        })
    }

    /// Re-applies the saved permission names when the stored rows for the
    /// role contain duplicates. Returns whether a repair happened.
    async fn collapse_duplicates(&self, role: &Role) -> AppResult<bool> {
        let rows = self.store.role_permission_rows(role.id).await?;
        let distinct: HashSet<PermissionId> = rows.iter().copied().collect();
        if distinct.len() == rows.len() {
            return Ok(false);
        }

        let names = self.permission_names(role.id).await?;
        let ids: Vec<PermissionId> = self
            .store
            .find_permissions_by_names(&names, &role.guard_name)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        self.store.replace_role_permissions(role.id, &ids).await?;

        warn!(
            role = %role.name,
            rows = rows.len(),
            distinct = distinct.len(),
            "Collapsed duplicate role permission rows"
        );
        Ok(true)
    }

    async fn permission_names(&self, role_id: RoleId) -> AppResult<Vec<String>> {
        Ok(self
            .store
            .role_permissions(role_id)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use async_trait::async_trait;
    use stockroom_core::types::UserId;
    use stockroom_database::MemoryRbacStore;
    use stockroom_entity::user::User;

    /// Store whose next role-permission write leaves one duplicate row behind.
    struct DuplicatingStore {
        inner: MemoryRbacStore,
        duplicate_next: AtomicBool,
    }

    #[async_trait]
    impl RbacStore for DuplicatingStore {
        async fn list_permissions(&self, guard_name: Option<&str>) -> AppResult<Vec<Permission>> {
            self.inner.list_permissions(guard_name).await
        }

        async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
            self.inner.find_permission(id).await
        }

        async fn find_permissions_by_ids(&self, ids: &[PermissionId]) -> AppResult<Vec<Permission>> {
            self.inner.find_permissions_by_ids(ids).await
        }

        async fn find_permissions_by_names(
            &self,
            names: &[String],
            guard_name: &str,
        ) -> AppResult<Vec<Permission>> {
            self.inner.find_permissions_by_names(names, guard_name).await
        }

        async fn create_permission(&self, new: &NewPermission) -> AppResult<Permission> {
            self.inner.create_permission(new).await
        }

        async fn find_or_create_permission(&self, new: &NewPermission) -> AppResult<Permission> {
            self.inner.find_or_create_permission(new).await
        }

        async fn update_permission(
            &self,
            id: PermissionId,
            name: &str,
            description: Option<&str>,
        ) -> AppResult<Permission> {
            self.inner.update_permission(id, name, description).await
        }

        async fn list_roles(&self) -> AppResult<Vec<Role>> {
            self.inner.list_roles().await
        }

        async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
            self.inner.find_role(id).await
        }

        async fn find_role_by_name(&self, name: &str, guard_name: &str) -> AppResult<Option<Role>> {
            self.inner.find_role_by_name(name, guard_name).await
        }

        async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
            self.inner.find_roles_by_ids(ids).await
        }

        async fn create_role(&self, name: &str, guard_name: &str) -> AppResult<Role> {
            self.inner.create_role(name, guard_name).await
        }

        async fn rename_role(&self, id: RoleId, name: &str) -> AppResult<Role> {
            self.inner.rename_role(id, name).await
        }

        async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
            self.inner.delete_role(id).await
        }

        async fn role_permission_rows(&self, role_id: RoleId) -> AppResult<Vec<PermissionId>> {
            self.inner.role_permission_rows(role_id).await
        }

        async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
            self.inner.role_permissions(role_id).await
        }

        async fn replace_role_permissions(
            &self,
            role_id: RoleId,
            permission_ids: &[PermissionId],
        ) -> AppResult<()> {
            self.inner
                .replace_role_permissions(role_id, permission_ids)
                .await?;
            if let Some(first) = permission_ids.first() {
                if self.duplicate_next.swap(false, Ordering::SeqCst) {
                    self.inner.push_role_permission_row(role_id, *first).await;
                }
            }
            Ok(())
        }

        async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
            self.inner.find_user(id).await
        }

        async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
            self.inner.user_roles(user_id).await
        }

        async fn replace_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<()> {
            self.inner.replace_user_roles(user_id, role_ids).await
        }

        async fn user_permission_names(&self, user_id: UserId) -> AppResult<Vec<String>> {
            self.inner.user_permission_names(user_id).await
        }
    }

    async fn catalog(store: &MemoryRbacStore, names: &[&str]) -> Vec<PermissionId> {
        let mut ids = Vec::new();
        for name in names {
            let permission = store
                .create_permission(&NewPermission::new(*name, "test", "web"))
                .await
                .unwrap();
            ids.push(permission.id);
        }
        ids
    }

    #[tokio::test]
    async fn test_super_admin_ignores_request() {
        let store = MemoryRbacStore::new();
        let ids = catalog(&store, &["assets.view", "roles.delete"]).await;
        let role = store.create_role("super_admin", "web").await.unwrap();
        let sync = RolePermissionSynchronizer::new(Arc::new(store.clone()));

        for request in [ids.clone(), vec![], vec![PermissionId(999_999)]] {
            let outcome = sync.sync(&role, &request).await.unwrap();
            assert_eq!(outcome.permissions, vec!["*".to_string()]);
            let rows = store.role_permission_rows(role.id).await.unwrap();
            assert_eq!(rows.len(), 1);
        }

        // The wildcard is created once and reused.
        let wildcards: Vec<_> = store
            .list_permissions(Some("web"))
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.is_wildcard())
            .collect();
        assert_eq!(wildcards.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_repeated_ids() {
        let store = MemoryRbacStore::new();
        let ids = catalog(&store, &["view-reports"]).await;
        let role = store.create_role("kpa", "web").await.unwrap();
        let sync = RolePermissionSynchronizer::new(Arc::new(store.clone()));

        let outcome = sync
            .sync(&role, &[ids[0], PermissionId(999_999), ids[0]])
            .await
            .unwrap();
        assert_eq!(outcome.permissions, vec!["view-reports".to_string()]);
        assert_eq!(outcome.dropped, vec![PermissionId(999_999)]);
        assert!(!outcome.repaired);
        assert_eq!(store.role_permission_rows(role.id).await.unwrap(), vec![ids[0]]);
    }

    #[tokio::test]
    async fn test_other_guard_is_dropped() {
        let store = MemoryRbacStore::new();
        let api = store
            .create_permission(&NewPermission::new("assets.view", "assets", "api"))
            .await
            .unwrap();
        let role = store.create_role("operator", "web").await.unwrap();
        let sync = RolePermissionSynchronizer::new(Arc::new(store.clone()));

        let outcome = sync.sync(&role, &[api.id]).await.unwrap();
        assert!(outcome.permissions.is_empty());
        assert_eq!(outcome.dropped, vec![api.id]);
    }

    #[tokio::test]
    async fn test_empty_request_clears() {
        let store = MemoryRbacStore::new();
        let ids = catalog(&store, &["assets.view", "assets.edit"]).await;
        let role = store.create_role("operator", "web").await.unwrap();
        let sync = RolePermissionSynchronizer::new(Arc::new(store.clone()));

        sync.sync(&role, &ids).await.unwrap();
        let outcome = sync.sync(&role, &[]).await.unwrap();
        assert!(outcome.permissions.is_empty());
        assert!(store.role_permission_rows(role.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_rows_after_write_are_repaired() {
        let inner = MemoryRbacStore::new();
        let ids = catalog(&inner, &["assets.view", "assets.edit"]).await;
        let role = inner.create_role("operator", "web").await.unwrap();
        let store = Arc::new(DuplicatingStore {
            inner: inner.clone(),
            duplicate_next: AtomicBool::new(true),
        });
        let sync = RolePermissionSynchronizer::new(store);

        let outcome = sync.sync(&role, &ids).await.unwrap();
        assert!(outcome.repaired);
        assert_eq!(
            outcome.permissions,
            vec!["assets.edit".to_string(), "assets.view".to_string()]
        );
        let rows = inner.role_permission_rows(role.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        let distinct: HashSet<PermissionId> = rows.iter().copied().collect();
        assert_eq!(distinct.len(), 2);

        // Clean writes report no repair.
        let outcome = sync.sync(&role, &ids).await.unwrap();
        assert!(!outcome.repaired);
    }
}
