use async_trait::async_trait;

use rolevault_core::AppResult;
use rolevault_domain::{PermissionId, Role, RoleId, UserId};

use super::inputs::NewRole;

/// Repository port for role records and their relation rows.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Fetches one role by identity key.
    async fn fetch_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Fetches one role by name, compared through the fixed one-way hash.
    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Fetches every role, ordered by name.
    async fn fetch_all(&self) -> AppResult<Vec<Role>>;

    /// Fetches a page of roles ordered by name. Negative arguments fail
    /// with `Validation` (see [`super::validate_page`]).
    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<Role>>;

    /// Inserts a new role and returns the persisted record.
    async fn insert(&self, role: NewRole) -> AppResult<Role>;

    /// Updates the mutable columns of an existing role.
    async fn update(&self, role: &Role) -> AppResult<()>;

    /// Deletes a role, consuming the record.
    async fn delete(&self, role: Role) -> AppResult<()>;

    /// Fetches the roles a user belongs to.
    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Fetches the roles a user belongs to, addressed by user name.
    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<Role>>;

    /// Fetches the roles a permission is granted to.
    async fn fetch_by_permission_id(&self, permission_id: PermissionId) -> AppResult<Vec<Role>>;

    /// Fetches the roles a permission is granted to, addressed by name.
    async fn fetch_by_permission_name(&self, permission_name: &str) -> AppResult<Vec<Role>>;

    /// Upserts a role-permission grant row.
    async fn grant_permission(&self, role_id: RoleId, permission_id: PermissionId)
    -> AppResult<()>;

    /// Deletes a role-permission grant row.
    async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Upserts a user-role membership row.
    async fn add_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<()>;

    /// Deletes a user-role membership row.
    async fn remove_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<()>;
}
