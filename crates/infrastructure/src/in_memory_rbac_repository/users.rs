use async_trait::async_trait;
use chrono::Utc;

use rolevault_application::{NewUser, UserRepository, validate_page};
use rolevault_core::hash::sha256_hex;
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{PermissionId, RoleId, User, UserId};

use super::{InMemoryRbacRepository, conflict, missing_reference, sorted_by_name};

#[async_trait]
impl UserRepository for InMemoryRbacRepository {
    async fn fetch_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id.as_i64()).cloned())
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let digest = sha256_hex(name);
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|user| sha256_hex(&user.name) == digest)
            .cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<User>> {
        let users: Vec<User> = self.state.read().await.users.values().cloned().collect();
        Ok(sorted_by_name(users, |user| user.name.clone()))
    }

    async fn fetch_limit(&self, offset: i64, row_count: i64) -> AppResult<Vec<User>> {
        validate_page(offset, row_count)?;

        let users = UserRepository::fetch_all(self).await?;
        Ok(users
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or_default())
            .take(usize::try_from(row_count).unwrap_or_default())
            .collect())
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|existing| existing.name == user.name || existing.email == user.email)
        {
            return Err(conflict("user"));
        }

        let id = state.next_user_id();
        let record = User {
            id: UserId::from_i64(id),
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            description: user.description,
            password_hash: user.password_hash,
            active: true,
            created: Utc::now(),
            last_update: Utc::now(),
        };
        state.users.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user.id.as_i64()) {
            return Err(AppError::NotFound(format!(
                "user '{}' was not found",
                user.id
            )));
        }
        if state
            .users
            .values()
            .any(|existing| existing.id != user.id && existing.name == user.name)
        {
            return Err(conflict("user"));
        }

        let mut record = user.clone();
        record.last_update = Utc::now();
        state.users.insert(user.id.as_i64(), record);

        Ok(())
    }

    async fn delete(&self, user: User) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.users.remove(&user.id.as_i64()).is_none() {
            return Err(AppError::NotFound(format!(
                "user '{}' was not found",
                user.id
            )));
        }

        let id = user.id.as_i64();
        state.user_roles.retain(|(member, _)| *member != id);
        state.user_permissions.retain(|(holder, _)| *holder != id);

        Ok(())
    }

    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let users: Vec<User> = state
            .user_roles
            .iter()
            .filter(|(_, role)| *role == role_id.as_i64())
            .filter_map(|(user, _)| state.users.get(user).cloned())
            .collect();

        Ok(sorted_by_name(users, |user| user.name.clone()))
    }

    async fn fetch_by_role_name(&self, role_name: &str) -> AppResult<Vec<User>> {
        let role_id = {
            let state = self.state.read().await;
            state
                .roles
                .values()
                .find(|role| role.name == role_name)
                .map(|role| role.id)
        };

        match role_id {
            Some(role_id) => UserRepository::fetch_by_role_id(self, role_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_by_permission_id(&self, permission_id: PermissionId) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut holders: std::collections::BTreeSet<i64> = state
            .user_permissions
            .iter()
            .filter(|(_, permission)| *permission == permission_id.as_i64())
            .map(|(user, _)| *user)
            .collect();

        for (role, permission) in &state.role_permissions {
            if *permission != permission_id.as_i64() {
                continue;
            }
            holders.extend(
                state
                    .user_roles
                    .iter()
                    .filter(|(_, member_role)| member_role == role)
                    .map(|(user, _)| *user),
            );
        }

        let users: Vec<User> = holders
            .iter()
            .filter_map(|user| state.users.get(user).cloned())
            .collect();

        Ok(sorted_by_name(users, |user| user.name.clone()))
    }

    async fn fetch_by_permission_name(&self, permission_name: &str) -> AppResult<Vec<User>> {
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
                UserRepository::fetch_by_permission_id(self, permission_id).await
            }
            None => Ok(Vec::new()),
        }
    }

    async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id.as_i64())
            || !state.permissions.contains_key(&permission_id.as_i64())
        {
            return Err(missing_reference());
        }

        state
            .user_permissions
            .insert((user_id.as_i64(), permission_id.as_i64()));

        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.state
            .write()
            .await
            .user_permissions
            .remove(&(user_id.as_i64(), permission_id.as_i64()));

        Ok(())
    }

    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id.as_i64())
            || !state.roles.contains_key(&role_id.as_i64())
        {
            return Err(missing_reference());
        }

        state.user_roles.insert((user_id.as_i64(), role_id.as_i64()));

        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.state
            .write()
            .await
            .user_roles
            .remove(&(user_id.as_i64(), role_id.as_i64()));

        Ok(())
    }
}
