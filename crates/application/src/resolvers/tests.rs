use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use rolevault_core::hash::sha256_hex;
use rolevault_core::{AppError, AppResult};
use rolevault_domain::{
    Permission, PermissionGrant, PermissionId, Provenance, Role, RoleId, User, UserId,
    permission_token,
};

use crate::ports::{
    NewPermission, NewRole, NewUser, PermissionRepository, RoleRepository, UserRepository,
    validate_page,
};

use super::{PermissionResolver, RoleResolver, UserResolver};

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    permissions: BTreeMap<i64, Permission>,
    user_roles: BTreeSet<(i64, i64)>,
    role_permissions: BTreeSet<(i64, i64)>,
    user_permissions: BTreeSet<(i64, i64)>,
}

/// Relation-faithful fake backing the resolver tests.
#[derive(Default)]
struct FakeRbacStore {
    state: Mutex<State>,
}

impl FakeRbacStore {
    async fn seed_user(&self, id: i64, name: &str) -> UserId {
        let user = User {
            id: UserId::from_i64(id),
            uuid: Uuid::new_v4(),
            name: name.to_owned(),
            email: format!("{name}@example.com"),
            description: String::new(),
            password_hash: "$argon2id$stub".to_owned(),
            active: true,
            created: Utc::now(),
            last_update: Utc::now(),
        };
        self.state.lock().await.users.insert(id, user);
        UserId::from_i64(id)
    }

    async fn seed_role(&self, id: i64, name: &str) -> RoleId {
        let role = Role {
            id: RoleId::from_i64(id),
            name: name.to_owned(),
            description: String::new(),
            active: true,
            created: Utc::now(),
            last_update: Utc::now(),
        };
        self.state.lock().await.roles.insert(id, role);
        RoleId::from_i64(id)
    }

    async fn seed_permission(&self, id: i64, name: &str) -> PermissionId {
        let permission = Permission {
            id: PermissionId::from_i64(id),
            name: name.to_owned(),
            description: String::new(),
            created: Utc::now(),
            last_update: Utc::now(),
        };
        self.state.lock().await.permissions.insert(id, permission);
        PermissionId::from_i64(id)
    }
}

fn sorted_by_name<T>(mut values: Vec<T>, name: impl Fn(&T) -> String) -> Vec<T> {
    values.sort_by_key(name);
    values
}

#[async_trait]
impl UserRepository for FakeRbacStore {
    async fn fetch_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id.as_i64()).cloned())
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let digest = sha256_hex(name);
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|user| sha256_hex(&user.name) == digest)
            .cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<User>> {
        let users: Vec<User> = self.state.lock().await.users.values().cloned().collect();
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
        let mut state = self.state.lock().await;
        let id = state.users.keys().max().copied().unwrap_or_default() + 1;
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
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user.id.as_i64()) {
            return Err(AppError::NotFound(format!("user '{}'", user.id)));
        }
        state.users.insert(user.id.as_i64(), user.clone());
        Ok(())
    }

    async fn delete(&self, user: User) -> AppResult<()> {
        self.state.lock().await.users.remove(&user.id.as_i64());
        Ok(())
    }

    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
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
            let state = self.state.lock().await;
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
        let state = self.state.lock().await;
        let mut holders: BTreeSet<i64> = state
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
            let state = self.state.lock().await;
            state
                .permissions
                .values()
                .find(|permission| permission.name == permission_name)
                .map(|permission| permission.id)
        };
        match permission_id {
            Some(permission_id) => UserRepository::fetch_by_permission_id(self, permission_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.state
            .lock()
            .await
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
            .lock()
            .await
            .user_permissions
            .remove(&(user_id.as_i64(), permission_id.as_i64()));
        Ok(())
    }

    async fn add_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.state
            .lock()
            .await
            .user_roles
            .insert((user_id.as_i64(), role_id.as_i64()));
        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.state
            .lock()
            .await
            .user_roles
            .remove(&(user_id.as_i64(), role_id.as_i64()));
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn fetch_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.lock().await.roles.get(&role_id.as_i64()).cloned())
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let digest = sha256_hex(name);
        Ok(self
            .state
            .lock()
            .await
            .roles
            .values()
            .find(|role| sha256_hex(&role.name) == digest)
            .cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Role>> {
        let roles: Vec<Role> = self.state.lock().await.roles.values().cloned().collect();
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
        let mut state = self.state.lock().await;
        let id = state.roles.keys().max().copied().unwrap_or_default() + 1;
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
        let mut state = self.state.lock().await;
        if !state.roles.contains_key(&role.id.as_i64()) {
            return Err(AppError::NotFound(format!("role '{}'", role.id)));
        }
        state.roles.insert(role.id.as_i64(), role.clone());
        Ok(())
    }

    async fn delete(&self, role: Role) -> AppResult<()> {
        self.state.lock().await.roles.remove(&role.id.as_i64());
        Ok(())
    }

    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
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
            let state = self.state.lock().await;
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
        let state = self.state.lock().await;
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
            let state = self.state.lock().await;
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
        self.state
            .lock()
            .await
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
            .lock()
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

#[async_trait]
impl PermissionRepository for FakeRbacStore {
    async fn fetch_by_id(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .get(&permission_id.as_i64())
            .cloned())
    }

    async fn fetch_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let digest = sha256_hex(name);
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .values()
            .find(|permission| sha256_hex(&permission.name) == digest)
            .cloned())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Permission>> {
        let permissions: Vec<Permission> = self
            .state
            .lock()
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
        let mut state = self.state.lock().await;
        let id = state.permissions.keys().max().copied().unwrap_or_default() + 1;
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
        let mut state = self.state.lock().await;
        if !state.permissions.contains_key(&permission.id.as_i64()) {
            return Err(AppError::NotFound(format!(
                "permission '{}'",
                permission.id
            )));
        }
        state
            .permissions
            .insert(permission.id.as_i64(), permission.clone());
        Ok(())
    }

    async fn delete(&self, permission: Permission) -> AppResult<()> {
        self.state
            .lock()
            .await
            .permissions
            .remove(&permission.id.as_i64());
        Ok(())
    }

    async fn fetch_by_role_id(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
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
            let state = self.state.lock().await;
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

    async fn fetch_by_user_id(&self, user_id: UserId) -> AppResult<Vec<PermissionGrant>> {
        let state = self.state.lock().await;
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

        Ok(grants)
    }

    async fn fetch_by_user_name(&self, user_name: &str) -> AppResult<Vec<PermissionGrant>> {
        let user_id = {
            let state = self.state.lock().await;
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
            .lock()
            .await
            .permissions
            .contains_key(&permission_id.as_i64()))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .values()
            .any(|permission| permission.name == name))
    }
}

fn user_resolver(store: &Arc<FakeRbacStore>) -> UserResolver {
    UserResolver::new(store.clone(), store.clone(), store.clone())
}

fn role_resolver(store: &Arc<FakeRbacStore>) -> RoleResolver {
    RoleResolver::new(store.clone(), store.clone(), store.clone())
}

#[tokio::test]
async fn grant_permission_returns_refreshed_aggregate() {
    let store = Arc::new(FakeRbacStore::default());
    let alice = store.seed_user(1, "alice").await;
    store.seed_permission(10, "delete_user").await;

    let resolver = user_resolver(&store);
    let aggregate = resolver
        .grant_permission(alice, PermissionId::from_i64(10))
        .await;

    assert!(aggregate.is_ok());
    let aggregate = aggregate.unwrap_or_else(|_| unreachable!());
    assert!(aggregate.holds_permission("delete_user"));
    assert_eq!(aggregate.permissions[0].provenance, Provenance::Direct);
}

#[tokio::test]
async fn revoking_ungranted_permission_is_a_noop() {
    let store = Arc::new(FakeRbacStore::default());
    let alice = store.seed_user(1, "alice").await;
    let never_granted = store.seed_permission(10, "delete_user").await;

    let resolver = user_resolver(&store);
    let before = resolver.fetch_by_id(alice).await;
    assert!(before.is_ok());

    let after = resolver.revoke_permission(alice, never_granted).await;
    assert!(after.is_ok());
    assert_eq!(
        before.unwrap_or_else(|_| unreachable!()),
        Some(after.unwrap_or_else(|_| unreachable!()))
    );
}

#[tokio::test]
async fn added_role_surfaces_inherited_permissions() {
    let store = Arc::new(FakeRbacStore::default());
    let alice = store.seed_user(1, "alice").await;
    let admin = store.seed_role(2, "admin").await;
    let delete_user = store.seed_permission(10, "delete_user").await;
    let grant = RoleRepository::grant_permission(store.as_ref(), admin, delete_user).await;
    assert!(grant.is_ok());

    let resolver = user_resolver(&store);
    let aggregate = resolver.add_role(alice, admin).await;

    assert!(aggregate.is_ok());
    let aggregate = aggregate.unwrap_or_else(|_| unreachable!());
    assert_eq!(aggregate.roles.len(), 1);
    assert_eq!(aggregate.permissions.len(), 1);
    assert_eq!(
        aggregate.permissions[0].provenance,
        Provenance::ViaRole(admin)
    );
}

#[tokio::test]
async fn grant_by_unknown_name_fails_with_not_found() {
    let store = Arc::new(FakeRbacStore::default());
    let alice = store.seed_user(1, "alice").await;

    let resolver = user_resolver(&store);
    let result = resolver
        .grant_permission_by_name(alice, "no_such_permission")
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn role_aggregate_embeds_members_and_grants() {
    let store = Arc::new(FakeRbacStore::default());
    let alice = store.seed_user(1, "alice").await;
    let admin = store.seed_role(2, "admin").await;
    store.seed_permission(10, "delete_user").await;

    let resolver = role_resolver(&store);
    let granted = resolver
        .grant_permission_by_name(admin, "delete_user")
        .await;
    assert!(granted.is_ok());

    let aggregate = resolver.add_user(admin, alice).await;
    assert!(aggregate.is_ok());
    let aggregate = aggregate.unwrap_or_else(|_| unreachable!());
    assert!(aggregate.has_member("alice"));
    assert!(aggregate.grants_permission("delete_user"));
}

#[tokio::test]
async fn permission_aggregate_embeds_every_holder() {
    let store = Arc::new(FakeRbacStore::default());
    let alice = store.seed_user(1, "alice").await;
    let bob = store.seed_user(2, "bob").await;
    let admin = store.seed_role(3, "admin").await;
    let delete_user = store.seed_permission(10, "delete_user").await;

    assert!(
        UserRepository::grant_permission(store.as_ref(), alice, delete_user)
            .await
            .is_ok()
    );
    assert!(
        RoleRepository::grant_permission(store.as_ref(), admin, delete_user)
            .await
            .is_ok()
    );
    assert!(
        UserRepository::add_role(store.as_ref(), bob, admin)
            .await
            .is_ok()
    );

    let resolver = PermissionResolver::new(store.clone(), store.clone(), store.clone());
    let aggregate = resolver.fetch_by_name("delete_user").await;
    assert!(aggregate.is_ok());
    let aggregate = aggregate.unwrap_or_default();
    assert!(aggregate.is_some());
    let aggregate = aggregate.unwrap_or_else(|| unreachable!());

    let holder_names: Vec<&str> = aggregate
        .users
        .iter()
        .map(|user| user.name.as_str())
        .collect();
    assert_eq!(holder_names, ["alice", "bob"]);
    assert_eq!(aggregate.roles.len(), 1);
    assert_eq!(aggregate.roles[0].name, "admin");
}

#[tokio::test]
async fn fetch_by_name_miss_returns_none() {
    let store = Arc::new(FakeRbacStore::default());
    let resolver = user_resolver(&store);

    let missing = resolver.fetch_by_name("nobody").await;
    assert!(missing.is_ok());
    assert!(missing.unwrap_or_else(|_| unreachable!()).is_none());
}

#[tokio::test]
async fn fetch_all_on_empty_store_returns_empty_collection() {
    let store = Arc::new(FakeRbacStore::default());
    let resolver = user_resolver(&store);

    let all = resolver.fetch_all().await;
    assert!(all.is_ok());
    assert!(all.unwrap_or_default().is_empty());

    let page = resolver.fetch_limit(0, 10).await;
    assert!(page.is_ok());
    assert!(page.unwrap_or_default().is_empty());
}
