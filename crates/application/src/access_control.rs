use std::collections::HashSet;
use std::sync::Arc;

use rolevault_core::AppResult;
use rolevault_domain::{PermissionId, UserId, permission_token};

use crate::ports::PermissionRepository;

/// Request-time membership checks over the effective permission token set.
///
/// This path never hydrates permission records: the store returns opaque
/// tokens and the check is a set lookup.
#[derive(Clone)]
pub struct AccessControl {
    permissions: Arc<dyn PermissionRepository>,
}

impl AccessControl {
    /// Creates an access checker over the permission repository port.
    #[must_use]
    pub fn new(permissions: Arc<dyn PermissionRepository>) -> Self {
        Self { permissions }
    }

    /// Fetches the effective token set for a user. A user with no grants
    /// yields an empty set.
    pub async fn effective_permission_tokens(
        &self,
        user_id: UserId,
    ) -> AppResult<HashSet<String>> {
        self.permissions.fetch_user_permission_tokens(user_id).await
    }

    /// Returns whether the user currently holds the permission, directly or
    /// through any role.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let tokens = self.effective_permission_tokens(user_id).await?;
        Ok(tokens.contains(&permission_token(user_id, permission_id)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    use async_trait::async_trait;
    use rolevault_core::AppResult;
    use rolevault_domain::{
        Permission, PermissionGrant, PermissionId, RoleId, UserId, permission_token,
    };

    use crate::ports::{NewPermission, PermissionRepository};

    use super::AccessControl;

    struct FakePermissionRepository {
        tokens: HashMap<UserId, HashSet<String>>,
    }

    #[async_trait]
    impl PermissionRepository for FakePermissionRepository {
        async fn fetch_by_id(&self, _: PermissionId) -> AppResult<Option<Permission>> {
            Ok(None)
        }

        async fn fetch_by_name(&self, _: &str) -> AppResult<Option<Permission>> {
            Ok(None)
        }

        async fn fetch_all(&self) -> AppResult<Vec<Permission>> {
            Ok(Vec::new())
        }

        async fn fetch_limit(&self, _: i64, _: i64) -> AppResult<Vec<Permission>> {
            Ok(Vec::new())
        }

        async fn insert(&self, _: NewPermission) -> AppResult<Permission> {
            unimplemented!("not exercised")
        }

        async fn update(&self, _: &Permission) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _: Permission) -> AppResult<()> {
            Ok(())
        }

        async fn fetch_by_role_id(&self, _: RoleId) -> AppResult<Vec<Permission>> {
            Ok(Vec::new())
        }

        async fn fetch_by_role_name(&self, _: &str) -> AppResult<Vec<Permission>> {
            Ok(Vec::new())
        }

        async fn fetch_by_user_id(&self, _: UserId) -> AppResult<Vec<PermissionGrant>> {
            Ok(Vec::new())
        }

        async fn fetch_by_user_name(&self, _: &str) -> AppResult<Vec<PermissionGrant>> {
            Ok(Vec::new())
        }

        async fn fetch_user_permission_tokens(
            &self,
            user_id: UserId,
        ) -> AppResult<HashSet<String>> {
            Ok(self.tokens.get(&user_id).cloned().unwrap_or_default())
        }

        async fn exists_by_id(&self, _: PermissionId) -> AppResult<bool> {
            Ok(false)
        }

        async fn exists_by_name(&self, _: &str) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn has_permission_matches_token_membership() {
        let user_id = UserId::from_i64(1);
        let granted = PermissionId::from_i64(7);
        let other = PermissionId::from_i64(8);

        let repository = FakePermissionRepository {
            tokens: HashMap::from([(
                user_id,
                HashSet::from([permission_token(user_id, granted)]),
            )]),
        };
        let access = AccessControl::new(Arc::new(repository));

        let held = access.has_permission(user_id, granted).await;
        assert!(held.is_ok());
        assert!(held.unwrap_or(false));

        let missing = access.has_permission(user_id, other).await;
        assert!(missing.is_ok());
        assert!(!missing.unwrap_or(true));
    }

    #[tokio::test]
    async fn user_without_grants_has_empty_token_set() {
        let repository = FakePermissionRepository {
            tokens: HashMap::new(),
        };
        let access = AccessControl::new(Arc::new(repository));

        let tokens = access
            .effective_permission_tokens(UserId::from_i64(42))
            .await;
        assert!(tokens.is_ok());
        assert!(tokens.unwrap_or_default().is_empty());
    }
}
