use rolevault_application::validate_page;
use rolevault_core::hash::sha256_hex;

use super::*;

impl PostgresUserRepository {
    pub(super) async fn fetch_by_id_impl(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, uuid, name, email, description, password_hash, active, created, last_update
            FROM users
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch user by id: {error}")))?;

        Ok(row.map(User::from))
    }

    // Name lookups compare SHA-256 digests rather than raw names, so the
    // bound value never has to appear in the statement text.
    pub(super) async fn fetch_by_name_impl(&self, name: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, uuid, name, email, description, password_hash, active, created, last_update
            FROM users
            WHERE encode(sha256(convert_to(name, 'UTF8')), 'hex') = $1
            LIMIT 1
            "#,
        )
        .bind(sha256_hex(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch user by name: {error}")))?;

        Ok(row.map(User::from))
    }

    pub(super) async fn fetch_all_impl(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, uuid, name, email, description, password_hash, active, created, last_update
            FROM users
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch users: {error}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub(super) async fn fetch_limit_impl(
        &self,
        offset: i64,
        row_count: i64,
    ) -> AppResult<Vec<User>> {
        validate_page(offset, row_count)?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, uuid, name, email, description, password_hash, active, created, last_update
            FROM users
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(row_count)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch user page: {error}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub(super) async fn fetch_by_role_id_impl(&self, role_id: RoleId) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.uuid, u.name, u.email, u.description, u.password_hash,
                   u.active, u.created, u.last_update
            FROM users AS u
            INNER JOIN user_roles AS ur ON ur.user_id = u.id
            WHERE ur.role_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch users by role: {error}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub(super) async fn fetch_by_role_name_impl(&self, role_name: &str) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.uuid, u.name, u.email, u.description, u.password_hash,
                   u.active, u.created, u.last_update
            FROM users AS u
            INNER JOIN user_roles AS ur ON ur.user_id = u.id
            INNER JOIN roles AS r ON r.id = ur.role_id
            WHERE r.name = $1
            ORDER BY u.name
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch users by role name: {error}"))
        })?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    // UNION collapses users reachable both directly and through a role to a
    // single row.
    pub(super) async fn fetch_by_permission_id_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.uuid, u.name, u.email, u.description, u.password_hash,
                   u.active, u.created, u.last_update
            FROM users AS u
            INNER JOIN user_permissions AS up ON up.user_id = u.id
            WHERE up.permission_id = $1
            UNION
            SELECT u.id, u.uuid, u.name, u.email, u.description, u.password_hash,
                   u.active, u.created, u.last_update
            FROM users AS u
            INNER JOIN user_roles AS ur ON ur.user_id = u.id
            INNER JOIN role_permissions AS rp ON rp.role_id = ur.role_id
            WHERE rp.permission_id = $1
            ORDER BY name
            "#,
        )
        .bind(permission_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch users by permission: {error}"))
        })?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub(super) async fn fetch_by_permission_name_impl(
        &self,
        permission_name: &str,
    ) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.uuid, u.name, u.email, u.description, u.password_hash,
                   u.active, u.created, u.last_update
            FROM users AS u
            INNER JOIN user_permissions AS up ON up.user_id = u.id
            INNER JOIN permissions AS p ON p.id = up.permission_id
            WHERE p.name = $1
            UNION
            SELECT u.id, u.uuid, u.name, u.email, u.description, u.password_hash,
                   u.active, u.created, u.last_update
            FROM users AS u
            INNER JOIN user_roles AS ur ON ur.user_id = u.id
            INNER JOIN role_permissions AS rp ON rp.role_id = ur.role_id
            INNER JOIN permissions AS p ON p.id = rp.permission_id
            WHERE p.name = $1
            ORDER BY name
            "#,
        )
        .bind(permission_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch users by permission name: {error}"))
        })?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
