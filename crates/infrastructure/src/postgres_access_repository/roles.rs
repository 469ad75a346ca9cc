use super::*;

impl PostgresAccessRepository {
    pub(super) async fn list_active_roles_by_codes_impl(
        &self,
        codes: &[RoleCode],
    ) -> AppResult<Vec<RoleRecord>> {
        let codes: Vec<String> = codes.iter().map(|code| code.as_str().to_owned()).collect();

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, code, weight, is_active, is_deleted
            FROM roles
            WHERE code = ANY($1) AND is_active AND NOT is_deleted
            ORDER BY code
            "#,
        )
        .bind(&codes)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles by code: {error}")))?;

        rows.into_iter().map(RoleRecord::try_from).collect()
    }

    pub(super) async fn find_active_role_by_code_impl(
        &self,
        code: &RoleCode,
    ) -> AppResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, code, weight, is_active, is_deleted
            FROM roles
            WHERE code = $1 AND is_active AND NOT is_deleted
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role by code: {error}")))?;

        row.map(RoleRecord::try_from).transpose()
    }

    pub(super) async fn insert_roles_impl(&self, roles: Vec<NewRole>) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for role in roles {
            sqlx::query(
                r#"
                INSERT INTO roles (name, code, weight)
                VALUES ($1, $2, $3)
                ON CONFLICT (code) WHERE is_active AND NOT is_deleted DO NOTHING
                "#,
            )
            .bind(role.name.as_str())
            .bind(role.name.code().as_str())
            .bind(role.weight)
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to insert role: {error}")))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
