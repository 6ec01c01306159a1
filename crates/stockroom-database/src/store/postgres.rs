//! PostgreSQL implementation of [`RbacStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use stockroom_core::error::{AppError, ErrorKind};
use stockroom_core::result::AppResult;
use stockroom_core::types::{PermissionId, RoleId, UserId};
use stockroom_entity::permission::{NewPermission, Permission};
use stockroom_entity::role::Role;
use stockroom_entity::user::User;

use super::RbacStore;

/// Role/permission store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRbacStore {
    pool: PgPool,
}

impl PgRbacStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error into a database `AppError` with context.
fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Map a sqlx error, turning unique violations into conflicts.
fn write_err(context: &'static str, conflict: String) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
        if unique {
            AppError::conflict(conflict)
        } else {
            AppError::with_source(ErrorKind::Database, context, e)
        }
    }
}

fn raw_ids<T: Copy + Into<i64>>(ids: &[T]) -> Vec<i64> {
    ids.iter().map(|id| (*id).into()).collect()
}

#[async_trait]
impl RbacStore for PgRbacStore {
    async fn list_permissions(&self, guard_name: Option<&str>) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE ($1::TEXT IS NULL OR guard_name = $1) \
             ORDER BY module ASC, name ASC",
        )
        .bind(guard_name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list permissions"))
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find permission"))
    }

    async fn find_permissions_by_ids(&self, ids: &[PermissionId]) -> AppResult<Vec<Permission>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE id = ANY($1) ORDER BY id ASC",
        )
        .bind(raw_ids(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to resolve permissions"))
    }

    async fn find_permissions_by_names(
        &self,
        names: &[String],
        guard_name: &str,
    ) -> AppResult<Vec<Permission>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE name = ANY($1) AND guard_name = $2 ORDER BY id ASC",
        )
        .bind(names)
        .bind(guard_name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to resolve permissions by name"))
    }

    async fn create_permission(&self, new: &NewPermission) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, module, description, guard_name) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.module)
        .bind(&new.description)
        .bind(&new.guard_name)
        .fetch_one(&self.pool)
        .await
        .map_err(write_err(
            "Failed to create permission",
            format!("Permission '{}' already exists", new.name),
        ))
    }

    async fn find_or_create_permission(&self, new: &NewPermission) -> AppResult<Permission> {
        let inserted = sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, module, description, guard_name) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name, guard_name) DO NOTHING RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.module)
        .bind(&new.description)
        .bind(&new.guard_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to create permission"))?;

        if let Some(permission) = inserted {
            debug!(name = %permission.name, id = %permission.id, "Permission created");
            return Ok(permission);
        }

        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE name = $1 AND guard_name = $2",
        )
        .bind(&new.name)
        .bind(&new.guard_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to load existing permission"))
    }

    async fn update_permission(
        &self,
        id: PermissionId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "UPDATE permissions SET name = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_err(
            "Failed to update permission",
            format!("Permission '{name}' already exists"),
        ))?
        .ok_or_else(|| AppError::not_found(format!("Permission {id} not found")))
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list roles"))
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find role"))
    }

    async fn find_role_by_name(&self, name: &str, guard_name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1 AND guard_name = $2")
            .bind(name)
            .bind(guard_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find role by name"))
    }

    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = ANY($1) ORDER BY id ASC")
            .bind(raw_ids(ids))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to resolve roles"))
    }

    async fn create_role(&self, name: &str, guard_name: &str) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, guard_name) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(guard_name)
        .fetch_one(&self.pool)
        .await
        .map_err(write_err(
            "Failed to create role",
            format!("Role '{name}' already exists"),
        ))
    }

    async fn rename_role(&self, id: RoleId, name: &str) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_err(
            "Failed to rename role",
            format!("Role '{name}' already exists"),
        ))?
        .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete role"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn role_permission_rows(&self, role_id: RoleId) -> AppResult<Vec<PermissionId>> {
        sqlx::query_scalar::<_, PermissionId>(
            "SELECT permission_id FROM role_has_permissions WHERE role_id = $1 ORDER BY id ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load role permission rows"))
    }

    async fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE id IN \
             (SELECT permission_id FROM role_has_permissions WHERE role_id = $1) \
             ORDER BY name ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load role permissions"))
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        sqlx::query("DELETE FROM role_has_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to clear role permissions"))?;

        if !permission_ids.is_empty() {
            sqlx::query(
                "INSERT INTO role_has_permissions (role_id, permission_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(role_id)
            .bind(raw_ids(permission_ids))
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to write role permissions"))?;
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit role permissions"))
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user"))
    }

    async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             INNER JOIN user_has_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load user roles"))
    }

    async fn replace_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        sqlx::query("DELETE FROM user_has_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to clear user roles"))?;

        if !role_ids.is_empty() {
            sqlx::query(
                "INSERT INTO user_has_roles (user_id, role_id) \
                 SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(raw_ids(role_ids))
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to write user roles"))?;
        }

        tx.commit().await.map_err(db_err("Failed to commit user roles"))
    }

    async fn user_permission_names(&self, user_id: UserId) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT p.name FROM permissions p \
             INNER JOIN role_has_permissions rp ON rp.permission_id = p.id \
             INNER JOIN user_has_roles ur ON ur.role_id = rp.role_id \
             WHERE ur.user_id = $1 ORDER BY p.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load user permissions"))
    }
}
