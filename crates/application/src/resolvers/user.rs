use std::sync::Arc;

use rolevault_core::{AppError, AppResult};
use rolevault_domain::{PermissionId, RoleId, User, UserExtended, UserId};

use crate::ports::{PermissionRepository, RoleRepository, UserRepository};

/// Resolver producing user aggregates with embedded roles and permissions.
#[derive(Clone)]
pub struct UserResolver {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

impl UserResolver {
    /// Creates a resolver over the three repository ports.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
        }
    }

    /// Fetches one user aggregate by identity key.
    pub async fn fetch_by_id(&self, user_id: UserId) -> AppResult<Option<UserExtended>> {
        match self.users.fetch_by_id(user_id).await? {
            Some(user) => Ok(Some(self.compose(user).await?)),
            None => Ok(None),
        }
    }

    /// Fetches one user aggregate by name.
    pub async fn fetch_by_name(&self, name: &str) -> AppResult<Option<UserExtended>> {
        match self.users.fetch_by_name(name).await? {
            Some(user) => Ok(Some(self.compose(user).await?)),
            None => Ok(None),
        }
    }

    /// Fetches every user aggregate, ordered by user name.
    pub async fn fetch_all(&self) -> AppResult<Vec<UserExtended>> {
        let users = self.users.fetch_all().await?;
        self.compose_all(users).await
    }

    /// Fetches a page of user aggregates ordered by user name.
    pub async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<UserExtended>> {
        let users = self.users.fetch_limit(offset, row_count).await?;
        self.compose_all(users).await
    }

    /// Fetches the aggregates of every member of a role.
    pub async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<UserExtended>> {
        let users = self.users.fetch_by_role_id(role_id).await?;
        self.compose_all(users).await
    }

    /// Fetches the aggregates of every member of a role addressed by name.
    pub async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<UserExtended>> {
        let users = self.users.fetch_by_role_name(role_name).await?;
        self.compose_all(users).await
    }

    /// Fetches the aggregates of every user holding a permission, directly
    /// or through a role.
    pub async fn fetch_by_permission_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<UserExtended>> {
        let users = self.users.fetch_by_permission_id(permission_id).await?;
        self.compose_all(users).await
    }

    /// Fetches the aggregates of every user holding a permission addressed
    /// by name.
    pub async fn fetch_by_permission_name(
        &self,
        permission_name: &str,
    ) -> AppResult<Vec<UserExtended>> {
        let users = self.users.fetch_by_permission_name(permission_name).await?;
        self.compose_all(users).await
    }

    /// Grants a permission directly to the user and returns the refreshed
    /// aggregate. Re-granting an existing permission is a no-op.
    pub async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<UserExtended> {
        self.users.grant_permission(user_id, permission_id).await?;
        self.require(user_id).await
    }

    /// Grants a permission addressed by name. Fails with `NotFound` when no
    /// permission carries the name.
    pub async fn grant_permission_by_name(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<UserExtended> {
        let permission = self.require_permission(permission_name).await?;
        self.grant_permission(user_id, permission).await
    }

    /// Revokes a direct permission grant and returns the refreshed
    /// aggregate. Revoking an absent grant is a no-op.
    pub async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<UserExtended> {
        self.users.revoke_permission(user_id, permission_id).await?;
        self.require(user_id).await
    }

    /// Revokes a direct permission grant addressed by name.
    pub async fn revoke_permission_by_name(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<UserExtended> {
        let permission = self.require_permission(permission_name).await?;
        self.revoke_permission(user_id, permission).await
    }

    /// Adds the user to a role and returns the refreshed aggregate.
    pub async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<UserExtended> {
        self.users.add_role(user_id, role_id).await?;
        self.require(user_id).await
    }

    /// Adds the user to a role addressed by name.
    pub async fn add_role_by_name(
        &self,
        user_id: UserId,
        role_name: &str,
    ) -> AppResult<UserExtended> {
        let role = self.require_role(role_name).await?;
        self.add_role(user_id, role).await
    }

    /// Removes the user from a role and returns the refreshed aggregate.
    pub async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<UserExtended> {
        self.users.remove_role(user_id, role_id).await?;
        self.require(user_id).await
    }

    /// Removes the user from a role addressed by name.
    pub async fn remove_role_by_name(
        &self,
        user_id: UserId,
        role_name: &str,
    ) -> AppResult<UserExtended> {
        let role = self.require_role(role_name).await?;
        self.remove_role(user_id, role).await
    }

    async fn compose(&self, user: User) -> AppResult<UserExtended> {
        let roles = self.roles.fetch_by_user_id(user.id).await?;
        let permissions = self.permissions.fetch_by_user_id(user.id).await?;

        Ok(UserExtended {
            user,
            roles,
            permissions,
        })
    }

    async fn compose_all(&self, users: Vec<User>) -> AppResult<Vec<UserExtended>> {
        let mut composed = Vec::with_capacity(users.len());
        for user in users {
            composed.push(self.compose(user).await?);
        }

        Ok(composed)
    }

    async fn require(&self, user_id: UserId) -> AppResult<UserExtended> {
        self.fetch_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))
    }

    async fn require_permission(&self, permission_name: &str) -> AppResult<PermissionId> {
        Ok(self
            .permissions
            .fetch_by_name(permission_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_name}' was not found"))
            })?
            .id)
    }

    async fn require_role(&self, role_name: &str) -> AppResult<RoleId> {
        Ok(self
            .roles
            .fetch_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_name}' was not found")))?
            .id)
    }
}
