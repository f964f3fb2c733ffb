use super::*;

impl PostgresRoleRepository {
    pub(super) async fn insert_impl(&self, role: NewRole) -> AppResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, description, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, active, created, last_update
            "#,
        )
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(role.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "insert role"))?;

        Ok(Role::from(row))
    }

    pub(super) async fn update_impl(&self, role: &Role) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2,
                description = $3,
                active = $4,
                last_update = NOW()
            WHERE id = $1
            "#,
        )
        .bind(role.id.as_i64())
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(role.active)
        .execute(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "update role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_impl(&self, role: Role) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role.id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id
            )));
        }

        Ok(())
    }
}
