use super::*;

impl PostgresUserRepository {
    pub(super) async fn insert_impl(&self, user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (uuid, name, email, description, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, uuid, name, email, description, password_hash,
                      active, created, last_update
            "#,
        )
        .bind(user.uuid)
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.description.as_str())
        .bind(user.password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "insert user"))?;

        Ok(User::from(row))
    }

    pub(super) async fn update_impl(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                description = $4,
                password_hash = $5,
                active = $6,
                last_update = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_i64())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.description.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user '{}' was not found",
                user.id
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_impl(&self, user: User) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user '{}' was not found",
                user.id
            )));
        }

        Ok(())
    }
}
