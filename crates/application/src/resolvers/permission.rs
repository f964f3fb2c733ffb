use std::sync::Arc;

use rolevault_core::AppResult;
use rolevault_domain::{Permission, PermissionExtended, PermissionId, RoleId};

use crate::ports::{PermissionRepository, RoleRepository, UserRepository};

/// Resolver producing permission aggregates with embedded holders.
///
/// Permissions have no relation mutations of their own: grants are owned by
/// the user and role resolvers.
#[derive(Clone)]
pub struct PermissionResolver {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
}

impl PermissionResolver {
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

    /// Fetches one permission aggregate by identity key.
    pub async fn fetch_by_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionExtended>> {
        match self.permissions.fetch_by_id(permission_id).await? {
            Some(permission) => Ok(Some(self.compose(permission).await?)),
            None => Ok(None),
        }
    }

    /// Fetches one permission aggregate by name.
    pub async fn fetch_by_name(&self, name: &str) -> AppResult<Option<PermissionExtended>> {
        match self.permissions.fetch_by_name(name).await? {
            Some(permission) => Ok(Some(self.compose(permission).await?)),
            None => Ok(None),
        }
    }

    /// Fetches every permission aggregate, ordered by permission name.
    pub async fn fetch_all(&self) -> AppResult<Vec<PermissionExtended>> {
        let permissions = self.permissions.fetch_all().await?;
        self.compose_all(permissions).await
    }

    /// Fetches a page of permission aggregates ordered by permission name.
    pub async fn fetch_limit(
        &self,
        offset: i64,
        row_count: i64,
    ) -> AppResult<Vec<PermissionExtended>> {
        let permissions = self.permissions.fetch_limit(offset, row_count).await?;
        self.compose_all(permissions).await
    }

    /// Fetches the aggregates of every permission granted to a role.
    pub async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<PermissionExtended>> {
        let permissions = self.permissions.fetch_by_role_id(role_id).await?;
        self.compose_all(permissions).await
    }

    /// Fetches the aggregates of every permission granted to a role
    /// addressed by name.
    pub async fn fetch_by_role_name(
        &self,
        role_name: &str,
    ) -> AppResult<Vec<PermissionExtended>> {
        let permissions = self.permissions.fetch_by_role_name(role_name).await?;
        self.compose_all(permissions).await
    }

    async fn compose(&self, permission: Permission) -> AppResult<PermissionExtended> {
        let users = self.users.fetch_by_permission_id(permission.id).await?;
        let roles = self.roles.fetch_by_permission_id(permission.id).await?;

        Ok(PermissionExtended {
            permission,
            users,
            roles,
        })
    }

    async fn compose_all(
        &self,
        permissions: Vec<Permission>,
    ) -> AppResult<Vec<PermissionExtended>> {
        let mut composed = Vec::with_capacity(permissions.len());
        for permission in permissions {
            composed.push(self.compose(permission).await?);
        }

        Ok(composed)
    }
}
