//! PostgreSQL-backed permission repository.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use rolevault_application::{NewPermission, PermissionRepository};
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{Permission, PermissionGrant, PermissionId, Provenance, RoleId, UserId};

/// PostgreSQL implementation of the permission repository port.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PermissionRow {
    id: i64,
    name: String,
    description: String,
    created: chrono::DateTime<chrono::Utc>,
    last_update: chrono::DateTime<chrono::Utc>,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: PermissionId::from_i64(row.id),
            name: row.name,
            description: row.description,
            created: row.created,
            last_update: row.last_update,
        }
    }
}

/// Permission row carrying its grant path: 0 for a direct grant, the role id
/// for an inherited one.
#[derive(Debug, sqlx::FromRow)]
struct PermissionGrantRow {
    id: i64,
    name: String,
    description: String,
    created: chrono::DateTime<chrono::Utc>,
    last_update: chrono::DateTime<chrono::Utc>,
    inherited: i64,
}

impl From<PermissionGrantRow> for PermissionGrant {
    fn from(row: PermissionGrantRow) -> Self {
        Self {
            permission: Permission {
                id: PermissionId::from_i64(row.id),
                name: row.name,
                description: row.description,
                created: row.created,
                last_update: row.last_update,
            },
            provenance: Provenance::from_marker(row.inherited),
        }
    }
}

mod account;
mod grants;
mod lookup;


#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn fetch_by_id(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        self.fetch_by_id_impl(permission_id).await
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        self.fetch_by_name_impl(name).await
    }

    async fn fetch_all(&self) -> AppResult<Vec<Permission>> {
        self.fetch_all_impl().await
    }

    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<Permission>> {
        self.fetch_limit_impl(offset, row_count).await
    }

    async fn insert(&self, permission: NewPermission) -> AppResult<Permission> {
        self.insert_impl(permission).await
    }

    async fn update(&self, permission: &Permission) -> AppResult<()> {
        self.update_impl(permission).await
    }

    async fn delete(&self, permission: Permission) -> AppResult<()> {
        self.delete_impl(permission).await
    }

    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        self.fetch_by_role_id_impl(role_id).await
    }

    async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<Permission>> {
        self.fetch_by_role_name_impl(role_name).await
    }

    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>> {
        self.fetch_by_user_id_impl(user_id).await
    }

    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<PermissionGrant>> {
        self.fetch_by_user_name_impl(user_name).await
    }

    async fn fetch_user_permission_tokens(&self, user_id: UserId) -> AppResult<HashSet<String>> {
        self.fetch_user_permission_tokens_impl(user_id).await
    }

    async fn exists_by_id(&self, permission_id: PermissionId) -> AppResult<bool> {
        self.exists_by_id_impl(permission_id).await
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.exists_by_name_impl(name).await
    }
}

fn name_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a permission with this name already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
