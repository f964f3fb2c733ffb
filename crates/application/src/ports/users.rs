use async_trait::async_trait;

use rolevault_core::AppResult;
use rolevault_domain::{PermissionId, RoleId, User, UserId};

use super::inputs::NewUser;

/// Repository port for user records and their relation rows.
///
/// Lookup misses resolve to `None`; storage failures surface as errors.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetches one user by identity key.
    async fn fetch_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Fetches one user by name, compared through the fixed one-way hash.
    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Fetches every user, ordered by name.
    async fn fetch_all(&self) -> AppResult<Vec<User>>;

    /// Fetches a page of users ordered by name. Negative arguments fail
    /// with `Validation` (see [`super::validate_page`]).
    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<User>>;

    /// Inserts a new user and returns the persisted record with its
    /// store-assigned identity key.
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Updates the mutable columns of an existing user.
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Deletes a user. Consumes the record: after a successful delete no
    /// stale copy of the row remains reachable through the argument.
    async fn delete(&self, user: User) -> AppResult<()>;

    /// Fetches the members of a role.
    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<User>>;

    /// Fetches the members of a role addressed by name.
    async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<User>>;

    /// Fetches every user holding a permission, whether granted directly
    /// or inherited through a role. Each user appears once.
    async fn fetch_by_permission_id(&self, permission_id: PermissionId) -> AppResult<Vec<User>>;

    /// Fetches every user holding a permission addressed by name.
    async fn fetch_by_permission_name(&self, permission_name: &str) -> AppResult<Vec<User>>;

    /// Upserts a direct user-permission grant row. Re-granting an existing
    /// relation is a no-op.
    async fn grant_permission(&self, user_id: UserId, permission_id: PermissionId)
    -> AppResult<()>;

    /// Deletes a direct user-permission grant row. Revoking an absent
    /// relation is a no-op.
    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Upserts a user-role membership row.
    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Deletes a user-role membership row.
    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;
}
