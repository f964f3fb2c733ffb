use super::*;

impl PostgresRoleRepository {
    pub(super) async fn grant_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(role_id.as_i64())
        .bind(permission_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| missing_reference_or_internal(error, "grant permission to role"))?;

        Ok(())
    }

    pub(super) async fn revoke_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2")
            .bind(role_id.as_i64())
            .bind(permission_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to revoke permission from role: {error}"))
            })?;

        Ok(())
    }

    pub(super) async fn add_user_impl(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| missing_reference_or_internal(error, "add user to role"))?;

        Ok(())
    }

    pub(super) async fn remove_user_impl(&self, role_id: RoleId, user_id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id.as_i64())
            .bind(role_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to remove user from role: {error}"))
            })?;

        Ok(())
    }
}
