use std::sync::Arc;

use rolevault_core::{AppError, AppResult};
use rolevault_domain::{PermissionId, Role, RoleExtended, RoleId, UserId};

use crate::ports::{PermissionRepository, RoleRepository, UserRepository};

/// Resolver producing role aggregates with embedded members and grants.
#[derive(Clone)]
pub struct RoleResolver {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

impl RoleResolver {
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

    /// Fetches one role aggregate by identity key.
    pub async fn fetch_by_id(&self, role_id: RoleId) -> AppResult<Option<RoleExtended>> {
        match self.roles.fetch_by_id(role_id).await? {
            Some(role) => Ok(Some(self.compose(role).await?)),
            None => Ok(None),
        }
    }

    /// Fetches one role aggregate by name.
    pub async fn fetch_by_name(&self, name: &str) -> AppResult<Option<RoleExtended>> {
        match self.roles.fetch_by_name(name).await? {
            Some(role) => Ok(Some(self.compose(role).await?)),
            None => Ok(None),
        }
    }

    /// Fetches every role aggregate, ordered by role name.
    pub async fn fetch_all(&self) -> AppResult<Vec<RoleExtended>> {
        let roles = self.roles.fetch_all().await?;
        self.compose_all(roles).await
    }

    /// Fetches a page of role aggregates ordered by role name.
    pub async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<RoleExtended>> {
        let roles = self.roles.fetch_limit(offset, row_count).await?;
        self.compose_all(roles).await
    }

    /// Fetches the aggregates of every role a user belongs to.
    pub async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<RoleExtended>> {
        let roles = self.roles.fetch_by_user_id(user_id).await?;
        self.compose_all(roles).await
    }

    /// Fetches the aggregates of every role a user belongs to, addressed by
    /// user name.
    pub async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<RoleExtended>> {
        let roles = self.roles.fetch_by_user_name(user_name).await?;
        self.compose_all(roles).await
    }

    /// Fetches the aggregates of every role holding a permission.
    pub async fn fetch_by_permission_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<RoleExtended>> {
        let roles = self.roles.fetch_by_permission_id(permission_id).await?;
        self.compose_all(roles).await
    }

    /// Fetches the aggregates of every role holding a permission addressed
    /// by name.
    pub async fn fetch_by_permission_name(
        &self,
        permission_name: &str,
    ) -> AppResult<Vec<RoleExtended>> {
        let roles = self.roles.fetch_by_permission_name(permission_name).await?;
        self.compose_all(roles).await
    }

    /// Grants a permission to the role and returns the refreshed aggregate.
    pub async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RoleExtended> {
        self.roles.grant_permission(role_id, permission_id).await?;
        self.require(role_id).await
    }

    /// Grants a permission addressed by name.
    pub async fn grant_permission_by_name(
        &self,
        role_id: RoleId,
        permission_name: &str,
    ) -> AppResult<RoleExtended> {
        let permission = self.require_permission(permission_name).await?;
        self.grant_permission(role_id, permission).await
    }

    /// Revokes a permission from the role and returns the refreshed
    /// aggregate. Revoking an absent grant is a no-op.
    pub async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RoleExtended> {
        self.roles.revoke_permission(role_id, permission_id).await?;
        self.require(role_id).await
    }

    /// Revokes a permission addressed by name.
    pub async fn revoke_permission_by_name(
        &self,
        role_id: RoleId,
        permission_name: &str,
    ) -> AppResult<RoleExtended> {
        let permission = self.require_permission(permission_name).await?;
        self.revoke_permission(role_id, permission).await
    }

    /// Adds a user to the role and returns the refreshed aggregate.
    pub async fn add_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<RoleExtended> {
        self.roles.add_user(role_id, user_id).await?;
        self.require(role_id).await
    }

    /// Adds a user addressed by name.
    pub async fn add_user_by_name(
        &self,
        role_id: RoleId,
        user_name: &str,
    ) -> AppResult<RoleExtended> {
        let user = self.require_user(user_name).await?;
        self.add_user(role_id, user).await
    }

    /// Removes a user from the role and returns the refreshed aggregate.
    pub async fn remove_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<RoleExtended> {
        self.roles.remove_user(role_id, user_id).await?;
        self.require(role_id).await
    }

    /// Removes a user addressed by name.
    pub async fn remove_user_by_name(
        &self,
        role_id: RoleId,
        user_name: &str,
    ) -> AppResult<RoleExtended> {
        let user = self.require_user(user_name).await?;
        self.remove_user(role_id, user).await
    }

    async fn compose(&self, role: Role) -> AppResult<RoleExtended> {
        let users = self.users.fetch_by_role_id(role.id).await?;
        let permissions = self.permissions.fetch_by_role_id(role.id).await?;

        Ok(RoleExtended {
            role,
            users,
            permissions,
        })
    }

    async fn compose_all(&self, roles: Vec<Role>) -> AppResult<Vec<RoleExtended>> {
        let mut composed = Vec::with_capacity(roles.len());
        for role in roles {
            composed.push(self.compose(role).await?);
        }

        Ok(composed)
    }

    async fn require(&self, role_id: RoleId) -> AppResult<RoleExtended> {
        self.fetch_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
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

    async fn require_user(&self, user_name: &str) -> AppResult<UserId> {
        Ok(self
            .users
            .fetch_by_name(user_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_name}' was not found")))?
            .id)
    }
}
