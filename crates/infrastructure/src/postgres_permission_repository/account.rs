use super::*;

impl PostgresPermissionRepository {
    pub(super) async fn insert_impl(&self, permission: NewPermission) -> AppResult<Permission> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created, last_update
            "#,
        )
        .bind(permission.name.as_str())
        .bind(permission.description.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "insert permission"))?;

        Ok(Permission::from(row))
    }

    pub(super) async fn update_impl(&self, permission: &Permission) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE permissions
            SET name = $2,
                description = $3,
                last_update = NOW()
            WHERE id = $1
            "#,
        )
        .bind(permission.id.as_i64())
        .bind(permission.name.as_str())
        .bind(permission.description.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "update permission"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_impl(&self, permission: Permission) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission.id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete permission: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.id
            )));
        }

        Ok(())
    }
}
