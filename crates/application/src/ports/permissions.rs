use std::collections::HashSet;

use async_trait::async_trait;

use rolevault_core::AppResult;
use rolevault_domain::{Permission, PermissionGrant, PermissionId, RoleId, UserId};

use super::inputs::NewPermission;

/// Repository port for permission records, grant rows, and the effective
/// token set.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Fetches one permission by identity key.
    async fn fetch_by_id(&self, permission_id: PermissionId) -> AppResult<Option<Permission>>;

    /// Fetches one permission by name, compared through the fixed one-way
    /// hash.
    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// Fetches every permission, ordered by name.
    async fn fetch_all(&self) -> AppResult<Vec<Permission>>;

    /// Fetches a page of permissions ordered by name. Negative arguments
    /// fail with `Validation` (see [`super::validate_page`]).
    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<Permission>>;

    /// Inserts a new permission and returns the persisted record.
    async fn insert(&self, permission: NewPermission) -> AppResult<Permission>;

    /// Updates the mutable columns of an existing permission.
    async fn update(&self, permission: &Permission) -> AppResult<()>;

    /// Deletes a permission, consuming the record.
    async fn delete(&self, permission: Permission) -> AppResult<()>;

    /// Fetches the permissions granted to a role.
    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Fetches the permissions granted to a role addressed by name.
    async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<Permission>>;

    /// Fetches a user's effective permissions, one grant per resolution
    /// path: a permission held directly and through a role yields two
    /// entries with different provenance.
    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>>;

    /// Fetches a user's effective permissions, addressed by user name.
    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<PermissionGrant>>;

    /// Builds the effective token set for a user: one token per held
    /// permission regardless of how many paths grant it. A user with no
    /// grants yields an empty set.
    async fn fetch_user_permission_tokens(&self, user_id: UserId) -> AppResult<HashSet<String>>;

    /// Returns whether a permission row exists for the key.
    async fn exists_by_id(&self, permission_id: PermissionId) -> AppResult<bool>;

    /// Returns whether a permission row exists for the name.
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;
}
