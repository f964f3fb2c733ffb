use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;

use rolevault_application::{NewPermission, PermissionRepository, validate_page};
use rolevault_core::hash::sha256_hex;
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{
    Permission, PermissionGrant, PermissionId, Provenance, RoleId, UserId, permission_token,
};

use super::{InMemoryRbacRepository, conflict, sorted_by_name};

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn fetch_by_id(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .get(&permission_id.as_i64())
            .cloned())
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let digest = sha256_hex(name);
        Ok(self
            .state
            .read()
            .await
            .permissions
            .values()
            .find(|permission| sha256_hex(&permission.name) == digest)
            .cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Permission>> {
        let permissions: Vec<Permission> = self
            .state
            .read()
            .await
            .permissions
            .values()
            .cloned()
            .collect();

        Ok(sorted_by_name(permissions, |permission| {
            permission.name.clone()
        }))
    }

    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<Permission>> {
        validate_page(offset, row_count)?;

        let permissions = PermissionRepository::fetch_all(self).await?;
        Ok(permissions
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or_default())
            .take(usize::try_from(row_count).unwrap_or_default())
            .collect())
    }

    async fn insert(&self, permission: NewPermission) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        if state
            .permissions
            .values()
            .any(|existing| existing.name == permission.name)
        {
            return Err(conflict("permission"));
        }

        let id = state.next_permission_id();
        let record = Permission {
            id: PermissionId::from_i64(id),
            name: permission.name,
            description: permission.description,
            created: Utc::now(),
            last_update: Utc::now(),
        };
        state.permissions.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, permission: &Permission) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.permissions.contains_key(&permission.id.as_i64()) {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id
            )));
        }
        if state
            .permissions
            .values()
            .any(|existing| existing.id != permission.id && existing.name == permission.name)
        {
            return Err(conflict("permission"));
        }

        let mut record = permission.clone();
        record.last_update = Utc::now();
        state.permissions.insert(permission.id.as_i64(), record);

        Ok(())
    }

    async fn delete(&self, permission: Permission) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.permissions.remove(&permission.id.as_i64()).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id
            )));
        }

        let id = permission.id.as_i64();
        state.user_permissions.retain(|(_, granted)| *granted != id);
        state.role_permissions.retain(|(_, granted)| *granted != id);

        Ok(())
    }

    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let permissions: Vec<Permission> = state
            .role_permissions
            .iter()
            .filter(|(role, _)| *role == role_id.as_i64())
            .filter_map(|(_, permission)| state.permissions.get(permission).cloned())
            .collect();

        Ok(sorted_by_name(permissions, |permission| {
            permission.name.clone()
        }))
    }

    async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<Permission>> {
        let role_id = {
            let state = self.state.read().await;
            state
                .roles
                .values()
                .find(|role| role.name == role_name)
                .map(|role| role.id)
        };

        match role_id {
            Some(role_id) => PermissionRepository::fetch_by_role_id(self, role_id).await,
            None => Ok(Vec::new()),
        }
    }

    // One grant per path, matching the two-branch provenance query.
    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>> {
        let state = self.state.read().await;
        let mut grants = Vec::new();

        for (user, permission) in &state.user_permissions {
            if *user != user_id.as_i64() {
                continue;
            }
            if let Some(record) = state.permissions.get(permission) {
                grants.push(PermissionGrant {
                    permission: record.clone(),
                    provenance: Provenance::Direct,
                });
            }
        }

        for (user, role) in &state.user_roles {
            if *user != user_id.as_i64() {
                continue;
            }
            for (grant_role, permission) in &state.role_permissions {
                if grant_role != role {
                    continue;
                }
                if let Some(record) = state.permissions.get(permission) {
                    grants.push(PermissionGrant {
                        permission: record.clone(),
                        provenance: Provenance::ViaRole(RoleId::from_i64(*role)),
                    });
                }
            }
        }

        grants.sort_by_key(|grant| (grant.permission.name.clone(), grant.provenance.marker()));

        Ok(grants)
    }

    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<PermissionGrant>> {
        let user_id = {
            let state = self.state.read().await;
            state
                .users
                .values()
                .find(|user| user.name == user_name)
                .map(|user| user.id)
        };

        match user_id {
            Some(user_id) => PermissionRepository::fetch_by_user_id(self, user_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_user_permission_tokens(&self, user_id: UserId) -> AppResult<HashSet<String>> {
        let grants = PermissionRepository::fetch_by_user_id(self, user_id).await?;
        Ok(grants
            .into_iter()
            .map(|grant| permission_token(user_id, grant.permission.id))
            .collect())
    }

    async fn exists_by_id(&self, permission_id: PermissionId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .contains_key(&permission_id.as_i64()))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .values()
            .any(|permission| permission.name == name))
    }
}
