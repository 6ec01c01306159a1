//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use stockroom_core::types::{PermissionId, RoleId};
use stockroom_database::{MemoryRbacStore, RbacStore};
use stockroom_entity::role::Role;
use stockroom_entity::user::User;
use stockroom_service::{RequestContext, Services};

/// Test application over a seeded in-memory store.
pub struct TestApp {
    /// Direct store access for assertions and fixtures.
    pub store: MemoryRbacStore,
    /// Services under test.
    pub services: Services,
}

impl TestApp {
    /// Create a seeded application.
    pub async fn new() -> Self {
        let store = MemoryRbacStore::new();
        let shared: Arc<dyn RbacStore> = Arc::new(store.clone());
        let services = Services::new(shared, "web");
        services.seeder.seed().await.expect("Failed to seed catalog");
        Self { store, services }
    }

    /// Operator context that bypasses policy checks.
    pub fn system(&self) -> RequestContext {
        RequestContext::system()
    }

    /// Context for an application user.
    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::new(user.id, user.name.clone())
    }

    /// Look up a seeded role by name.
    pub async fn role(&self, name: &str) -> Role {
        self.store
            .find_role_by_name(name, "web")
            .await
            .expect("store")
            .unwrap_or_else(|| panic!("role {name} not seeded"))
    }

    /// Look up a catalog permission ID by name.
    pub async fn permission_id(&self, name: &str) -> PermissionId {
        self.store
            .find_permissions_by_names(&[name.to_string()], "web")
            .await
            .expect("store")
            .first()
            .unwrap_or_else(|| panic!("permission {name} not seeded"))
            .id
    }

    /// Look up several catalog permission IDs by name.
    pub async fn permission_ids(&self, names: &[&str]) -> Vec<PermissionId> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            ids.push(self.permission_id(name).await);
        }
        ids
    }

    /// Names of the permissions a role holds, ordered by name.
    pub async fn role_permission_names(&self, role: &Role) -> Vec<String> {
        self.store
            .role_permissions(role.id)
            .await
            .expect("store")
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    /// Names of the roles a user holds, ordered by name.
    pub async fn user_role_names(&self, user: &User) -> Vec<String> {
        self.store
            .user_roles(user.id)
            .await
            .expect("store")
            .into_iter()
            .map(|r| r.name)
            .collect()
    }

    /// Create a user holding the named roles.
    pub async fn user_with_roles(&self, name: &str, roles: &[&str]) -> User {
        let user = self
            .store
            .insert_user(name, &format!("{name}@example.test"))
            .await;
        let mut ids: Vec<RoleId> = Vec::new();
        for role in roles {
            ids.push(self.role(role).await.id);
        }
        self.services
            .users
            .sync_roles(&self.system(), user.id, &ids)
            .await
            .expect("sync roles");
        user
    }
}
