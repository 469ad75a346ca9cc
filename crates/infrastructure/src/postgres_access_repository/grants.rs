use super::*;

impl PostgresAccessRepository {
    pub(super) async fn grant_exists_impl(
        &self,
        route_id: RouteId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM route_roles
                WHERE route_id = $1 AND role_id = $2
            )
            "#,
        )
        .bind(route_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check route grant: {error}")))
    }

    pub(super) async fn list_role_ids_for_route_impl(
        &self,
        route_id: RouteId,
    ) -> AppResult<Vec<RoleId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT role_id
            FROM route_roles
            WHERE route_id = $1
            ORDER BY role_id
            "#,
        )
        .bind(route_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list route grants: {error}")))?;

        Ok(ids.into_iter().map(RoleId::from_uuid).collect())
    }

    pub(super) async fn insert_grants_impl(&self, grants: Vec<NewRouteGrant>) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for grant in grants {
            sqlx::query(
                r#"
                INSERT INTO route_roles (route_id, role_id)
                VALUES ($1, $2)
                ON CONFLICT (route_id, role_id) DO NOTHING
                "#,
            )
            .bind(grant.route_id.as_uuid())
            .bind(grant.role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to insert route grant: {error}")))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
