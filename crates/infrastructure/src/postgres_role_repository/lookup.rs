use rolevault_application::validate_page;
use rolevault_core::hash::sha256_hex;

use super::*;

impl PostgresRoleRepository {
    pub(super) async fn fetch_by_id_impl(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, active, created, last_update
            FROM roles
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch role by id: {error}")))?;

        Ok(row.map(Role::from))
    }

    pub(super) async fn fetch_by_name_impl(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, active, created, last_update
            FROM roles
            WHERE encode(sha256(convert_to(name, 'UTF8')), 'hex') = $1
            LIMIT 1
            "#,
        )
        .bind(sha256_hex(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch role by name: {error}")))?;

        Ok(row.map(Role::from))
    }

    pub(super) async fn fetch_all_impl(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, active, created, last_update
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn fetch_limit_impl(
        &self,
        offset: i64,
        row_count: i64,
    ) -> AppResult<Vec<Role>> {
        validate_page(offset, row_count)?;

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, active, created, last_update
            FROM roles
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(row_count)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch role page: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn fetch_by_user_id_impl(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.description, r.active, r.created, r.last_update
            FROM roles AS r
            INNER JOIN user_roles AS ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch roles by user: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn fetch_by_user_name_impl(&self, user_name: &str) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.description, r.active, r.created, r.last_update
            FROM roles AS r
            INNER JOIN user_roles AS ur ON ur.role_id = r.id
            INNER JOIN users AS u ON u.id = ur.user_id
            WHERE u.name = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch roles by user name: {error}"))
        })?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn fetch_by_permission_id_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.description, r.active, r.created, r.last_update
            FROM roles AS r
            INNER JOIN role_permissions AS rp ON rp.role_id = r.id
            WHERE rp.permission_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(permission_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch roles by permission: {error}"))
        })?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn fetch_by_permission_name_impl(
        &self,
        permission_name: &str,
    ) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name, r.description, r.active, r.created, r.last_update
            FROM roles AS r
            INNER JOIN role_permissions AS rp ON rp.role_id = r.id
            INNER JOIN permissions AS p ON p.id = rp.permission_id
            WHERE p.name = $1
            ORDER BY r.name
            "#,
        )
        .bind(permission_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch roles by permission name: {error}"))
        })?;

        Ok(rows.into_iter().map(Role::from).collect())
    }
}
