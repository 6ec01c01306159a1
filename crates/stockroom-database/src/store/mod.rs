//! Storage contract for roles, permissions and their associations.
//!
//! The synchronizers and the authorization layer read and write access-control
//! state exclusively through [`RbacStore`]. Association writes are full
//! replacements: implementations must swap the whole set for an owner in one
//! atomic unit so that concurrent syncs resolve as last-write-wins.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use stockroom_core::result::AppResult;
use stockroom_core::types::{PermissionId, RoleId, UserId};
use stockroom_entity::permission::{NewPermission, Permission};
use stockroom_entity::role::Role;
use stockroom_entity::user::User;

pub use memory::MemoryRbacStore;
pub use postgres::PgRbacStore;

/// Read/write operations the access-control core needs from persistence.
#[async_trait]
pub trait RbacStore: Send + Sync + 'static {
    // -- Permission catalog --

    /// List catalog permissions, optionally restricted to one guard.
    async fn list_permissions(&self, guard_name: Option<&str>) -> AppResult<Vec<Permission>>;

    /// Find a permission by ID.
    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>>;

    /// Resolve a list of IDs. Unknown IDs are absent from the result.
    async fn find_permissions_by_ids(&self, ids: &[PermissionId]) -> AppResult<Vec<Permission>>;

    /// Resolve a list of names within a guard. Unknown names are absent from the result.
    async fn find_permissions_by_names(
        &self,
        names: &[String],
        guard_name: &str,
    ) -> AppResult<Vec<Permission>>;

    /// Insert a permission. Fails with a conflict if the name is taken in the guard.
    async fn create_permission(&self, new: &NewPermission) -> AppResult<Permission>;

    /// Return the permission with this name and guard, inserting it if missing.
    async fn find_or_create_permission(&self, new: &NewPermission) -> AppResult<Permission>;

    /// Rename a permission and/or replace its description.
    async fn update_permission(
        &self,
        id: PermissionId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Permission>;

    // -- Role catalog --

    /// List all roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Find a role by ID.
    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Find a role by name within a guard.
    async fn find_role_by_name(&self, name: &str, guard_name: &str) -> AppResult<Option<Role>>;

    /// Resolve a list of IDs. Unknown IDs are absent from the result.
    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>>;

    /// Insert a role. Fails with a conflict if the name is taken in the guard.
    async fn create_role(&self, name: &str, guard_name: &str) -> AppResult<Role>;

    /// Rename a role.
    async fn rename_role(&self, id: RoleId, name: &str) -> AppResult<Role>;

    /// Delete a role and every association that references it.
    async fn delete_role(&self, id: RoleId) -> AppResult<bool>;

    // -- Role -> permission association --

    /// Raw association rows for a role, one entry per stored row (may repeat).
    async fn role_permission_rows(&self, role_id: RoleId) -> AppResult<Vec<PermissionId>>;

    /// Distinct permissions assigned to a role, ordered by name.
    async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Atomically replace a role's association rows with exactly `permission_ids`.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()>;

    // -- Users --

    /// Find a user by ID.
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Roles currently assigned to a user, ordered by name.
    async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Atomically replace a user's roles with exactly `role_ids`.
    async fn replace_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<()>;

    /// Distinct permission names granted to a user through their roles.
    async fn user_permission_names(&self, user_id: UserId) -> AppResult<Vec<String>>;
}
