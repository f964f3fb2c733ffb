use super::*;

impl PostgresPermissionRepository {
    // One row per grant path: a permission held directly and through a role
    // appears once with inherited = 0 and once per granting role.
    pub(super) async fn fetch_by_user_id_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, PermissionGrantRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created, p.last_update,
                   0::BIGINT AS inherited
            FROM permissions AS p
            INNER JOIN user_permissions AS up ON up.permission_id = p.id
            WHERE up.user_id = $1
            UNION ALL
            SELECT p.id, p.name, p.description, p.created, p.last_update,
                   ur.role_id AS inherited
            FROM permissions AS p
            INNER JOIN role_permissions AS rp ON rp.permission_id = p.id
            INNER JOIN user_roles AS ur ON ur.role_id = rp.role_id
            WHERE ur.user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permissions by user: {error}"))
        })?;

        Ok(rows.into_iter().map(PermissionGrant::from).collect())
    }

    pub(super) async fn fetch_by_user_name_impl(
        &self,
        user_name: &str,
    ) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, PermissionGrantRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created, p.last_update,
                   0::BIGINT AS inherited
            FROM permissions AS p
            INNER JOIN user_permissions AS up ON up.permission_id = p.id
            INNER JOIN users AS u ON u.id = up.user_id
            WHERE u.name = $1
            UNION ALL
            SELECT p.id, p.name, p.description, p.created, p.last_update,
                   ur.role_id AS inherited
            FROM permissions AS p
            INNER JOIN role_permissions AS rp ON rp.permission_id = p.id
            INNER JOIN user_roles AS ur ON ur.role_id = rp.role_id
            INNER JOIN users AS u ON u.id = ur.user_id
            WHERE u.name = $1
            ORDER BY name
            "#,
        )
        .bind(user_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch permissions by user name: {error}"))
        })?;

        Ok(rows.into_iter().map(PermissionGrant::from).collect())
    }

    // Token digests are computed in SQL with the same `user_id.permission_id`
    // preimage as `permission_token`, so set membership agrees with the
    // in-process side. UNION collapses duplicate paths.
    pub(super) async fn fetch_user_permission_tokens_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<HashSet<String>> {
        let tokens = sqlx::query_scalar::<_, String>(
            r#"
            SELECT encode(sha256(convert_to(
                       up.user_id::TEXT || '.' || up.permission_id::TEXT, 'UTF8')), 'hex')
            FROM user_permissions AS up
            WHERE up.user_id = $1
            UNION
            SELECT encode(sha256(convert_to(
                       ur.user_id::TEXT || '.' || rp.permission_id::TEXT, 'UTF8')), 'hex')
            FROM user_roles AS ur
            INNER JOIN role_permissions AS rp ON rp.role_id = ur.role_id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch user permission tokens: {error}"))
        })?;

        Ok(tokens.into_iter().collect())
    }
}
