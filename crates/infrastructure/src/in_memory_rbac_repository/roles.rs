use async_trait::async_trait;
use chrono::Utc;

use rolevault_application::{NewRole, RoleRepository, UserRepository, validate_page};
use rolevault_core::hash::sha256_hex;
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{PermissionId, Role, RoleId, UserId};

use super::{InMemoryRbacRepository, conflict, missing_reference, sorted_by_name};

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn fetch_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id.as_i64()).cloned())
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let digest = sha256_hex(name);
        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .find(|role| sha256_hex(&role.name) == digest)
            .cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Role>> {
        let roles: Vec<Role> = self.state.read().await.roles.values().cloned().collect();
        Ok(sorted_by_name(roles, |role| role.name.clone()))
    }

    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<Role>> {
        validate_page(offset, row_count)?;

        let roles = RoleRepository::fetch_all(self).await?;
        Ok(roles
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or_default())
            .take(usize::try_from(row_count).unwrap_or_default())
            .collect())
    }

    async fn insert(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.roles.values().any(|existing| existing.name == role.name) {
            return Err(conflict("role"));
        }

        let id = state.next_role_id();
        let record = Role {
            id: RoleId::from_i64(id),
            name: role.name,
            description: role.description,
            active: role.active,
            created: Utc::now(),
            last_update: Utc::now(),
        };
        state.roles.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, role: &Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role.id.as_i64()) {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id
            )));
        }
        if state
            .roles
            .values()
            .any(|existing| existing.id != role.id && existing.name == role.name)
        {
            return Err(conflict("role"));
        }

        let mut record = role.clone();
        record.last_update = Utc::now();
        state.roles.insert(role.id.as_i64(), record);

        Ok(())
    }

    async fn delete(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.roles.remove(&role.id.as_i64()).is_none() {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id
            )));
        }

        let id = role.id.as_i64();
        state.user_roles.retain(|(_, member_role)| *member_role != id);
        state.role_permissions.retain(|(grantee, _)| *grantee != id);

        Ok(())
    }

    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let roles: Vec<Role> = state
            .user_roles
            .iter()
            .filter(|(user, _)| *user == user_id.as_i64())
            .filter_map(|(_, role)| state.roles.get(role).cloned())
            .collect();

        Ok(sorted_by_name(roles, |role| role.name.clone()))
    }

    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<Role>> {
        let user_id = {
            let state = self.state.read().await;
            state
                .users
                .values()
                .find(|user| user.name == user_name)
                .map(|user| user.id)
        };

        match user_id {
            Some(user_id) => RoleRepository::fetch_by_user_id(self, user_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_by_permission_id(&self, permission_id: PermissionId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let roles: Vec<Role> = state
            .role_permissions
            .iter()
            .filter(|(_, permission)| *permission == permission_id.as_i64())
            .filter_map(|(role, _)| state.roles.get(role).cloned())
            .collect();

        Ok(sorted_by_name(roles, |role| role.name.clone()))
    }

    async fn fetch_by_permission_name(&self, permission_name: &str) -> AppResult<Vec<Role>> {
        let permission_id = {
            let state = self.state.read().await;
            state
                .permissions
                .values()
                .find(|permission| permission.name == permission_name)
                .map(|permission| permission.id)
        };

        match permission_id {
            Some(permission_id) => {
                RoleRepository::fetch_by_permission_id(self, permission_id).await
            }
            None => Ok(Vec::new()),
        }
    }

    async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id.as_i64())
            || !state.permissions.contains_key(&permission_id.as_i64())
        {
            return Err(missing_reference());
        }

        state
            .role_permissions
            .insert((role_id.as_i64(), permission_id.as_i64()));

        Ok(())
    }

    async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.state
            .write()
            .await
            .role_permissions
            .remove(&(role_id.as_i64(), permission_id.as_i64()));

        Ok(())
    }

    async fn add_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        UserRepository::add_role(self, user_id, role_id).await
    }

    async fn remove_user(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        UserRepository::remove_role(self, user_id, role_id).await
    }
}
