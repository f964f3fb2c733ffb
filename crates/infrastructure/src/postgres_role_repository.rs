//! PostgreSQL-backed role repository.

use async_trait::async_trait;
use sqlx::PgPool;

use rolevault_application::{NewRole, RoleRepository};
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{PermissionId, Role, RoleId, UserId};

/// PostgreSQL implementation of the role repository port.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: String,
    active: bool,
    created: chrono::DateTime<chrono::Utc>,
    last_update: chrono::DateTime<chrono::Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::from_i64(row.id),
            name: row.name,
            description: row.description,
            active: row.active,
            created: row.created,
            last_update: row.last_update,
        }
    }
}

mod account;
mod lookup;
mod relations;

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn fetch_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.fetch_by_id_impl(role_id).await
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.fetch_by_name_impl(name).await
    }

    async fn fetch_all(&self) -> AppResult<Vec<Role>> {
        self.fetch_all_impl().await
    }

    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<Role>> {
        self.fetch_limit_impl(offset, row_count).await
    }

    async fn insert(&self, role: NewRole) -> AppResult<Role> {
        self.insert_impl(role).await
    }

    async fn update(&self, role: &Role) -> AppResult<()> {
        self.update_impl(role).await
    }

    async fn delete(&self, role: Role) -> AppResult<()> {
        self.delete_impl(role).await
    }

    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.fetch_by_user_id_impl(user_id).await
    }

    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<Role>> {
        self.fetch_by_user_name_impl(user_name).await
    }

    async fn fetch_by_permission_id(&self, permission_id: PermissionId) -> AppResult<Vec<Role>> {
        self.fetch_by_permission_id_impl(permission_id).await
    }

    async fn fetch_by_permission_name(&self, permission_name: &str) -> AppResult<Vec<Role>> {
        self.fetch_by_permission_name_impl(permission_name).await
    }

    async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.grant_permission_impl(role_id, permission_id).await
    }

    async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.revoke_permission_impl(role_id, permission_id).await
    }

    async fn add_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        self.add_user_impl(role_id, user_id).await
    }

    async fn remove_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        self.remove_user_impl(role_id, user_id).await
    }
}

fn name_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a role with this name already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn missing_reference_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound("referenced user, role or permission was not found".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
