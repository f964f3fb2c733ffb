//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use rolevault_application::{NewUser, UserRepository};
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{PermissionId, RoleId, User, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    uuid: uuid::Uuid,
    name: String,
    email: String,
    description: String,
    password_hash: String,
    active: bool,
    created: chrono::DateTime<chrono::Utc>,
    last_update: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_i64(row.id),
            uuid: row.uuid,
            name: row.name,
            email: row.email,
            description: row.description,
            password_hash: row.password_hash,
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
impl UserRepository for PostgresUserRepository {
    async fn fetch_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        self.fetch_by_id_impl(user_id).await
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<User>> {
        self.fetch_by_name_impl(name).await
    }

    async fn fetch_all(&self) -> AppResult<Vec<User>> {
        self.fetch_all_impl().await
    }

    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<User>> {
        self.fetch_limit_impl(offset, row_count).await
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        self.insert_impl(user).await
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.update_impl(user).await
    }

    async fn delete(&self, user: User) -> AppResult<()> {
        self.delete_impl(user).await
    }

    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<User>> {
        self.fetch_by_role_id_impl(role_id).await
    }

    async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<User>> {
        self.fetch_by_role_name_impl(role_name).await
    }

    async fn fetch_by_permission_id(&self, permission_id: PermissionId) -> AppResult<Vec<User>> {
        self.fetch_by_permission_id_impl(permission_id).await
    }

    async fn fetch_by_permission_name(&self, permission_name: &str) -> AppResult<Vec<User>> {
        self.fetch_by_permission_name_impl(permission_name).await
    }

    async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.grant_permission_impl(user_id, permission_id).await
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.revoke_permission_impl(user_id, permission_id).await
    }

    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.add_role_impl(user_id, role_id).await
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.remove_role_impl(user_id, role_id).await
    }
}

fn name_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a user with this name or email already exists".to_owned());
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
