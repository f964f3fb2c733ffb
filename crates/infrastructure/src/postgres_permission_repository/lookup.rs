use rolevault_application::validate_page;
use rolevault_core::hash::sha256_hex;

use super::*;

impl PostgresPermissionRepository {
    pub(super) async fn fetch_by_id_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created, last_update
            FROM permissions
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(permission_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permission by id: {error}"))
        })?;

        Ok(row.map(Permission::from))
    }

    pub(super) async fn fetch_by_name_impl(&self, name: &str) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created, last_update
            FROM permissions
            WHERE encode(sha256(convert_to(name, 'UTF8')), 'hex') = $1
            LIMIT 1
            "#,
        )
        .bind(sha256_hex(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permission by name: {error}"))
        })?;

        Ok(row.map(Permission::from))
    }

    pub(super) async fn fetch_all_impl(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created, last_update
            FROM permissions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch permissions: {error}")))?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn fetch_limit_impl(
        &self,
        offset: i64,
        row_count: i64,
    ) -> AppResult<Vec<Permission>> {
        validate_page(offset, row_count)?;

        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created, last_update
            FROM permissions
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(row_count)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permission page: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn fetch_by_role_id_impl(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created, p.last_update
            FROM permissions AS p
            INNER JOIN role_permissions AS rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permissions by role: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn fetch_by_role_name_impl(
        &self,
        role_name: &str,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created, p.last_update
            FROM permissions AS p
            INNER JOIN role_permissions AS rp ON rp.permission_id = p.id
            INNER JOIN roles AS r ON r.id = rp.role_id
            WHERE r.name = $1
            ORDER BY p.name
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permissions by role name: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn exists_by_id_impl(&self, permission_id: PermissionId) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM permissions WHERE id = $1)",
        )
        .bind(permission_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check permission existence: {error}"))
        })?;

        Ok(exists)
    }

    pub(super) async fn exists_by_name_impl(&self, name: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM permissions WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check permission existence by name: {error}"
            ))
        })?;

        Ok(exists)
    }
}
