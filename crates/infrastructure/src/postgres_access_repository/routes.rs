use super::*;

impl PostgresAccessRepository {
    pub(super) async fn list_all_routes_impl(&self) -> AppResult<Vec<RouteRecord>> {
        let rows = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT id, uri, method, route_name, is_active, is_deleted
            FROM project_routes
            ORDER BY uri, method
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list routes: {error}")))?;

        rows.into_iter().map(RouteRecord::try_from).collect()
    }

    pub(super) async fn list_active_routes_by_uris_and_methods_impl(
        &self,
        uris: &[RouteUri],
        methods: &[HttpMethod],
    ) -> AppResult<Vec<RouteRecord>> {
        let uris: Vec<String> = uris.iter().map(|uri| uri.as_str().to_owned()).collect();
        let methods: Vec<String> = methods
            .iter()
            .map(|method| method.as_str().to_owned())
            .collect();

        let rows = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT id, uri, method, route_name, is_active, is_deleted
            FROM project_routes
            WHERE uri = ANY($1) AND method = ANY($2) AND is_active AND NOT is_deleted
            "#,
        )
        .bind(&uris)
        .bind(&methods)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list routes by uri: {error}")))?;

        rows.into_iter().map(RouteRecord::try_from).collect()
    }

    pub(super) async fn find_active_route_by_name_and_method_impl(
        &self,
        route_name: &RouteName,
        method: HttpMethod,
    ) -> AppResult<Option<RouteRecord>> {
        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT id, uri, method, route_name, is_active, is_deleted
            FROM project_routes
            WHERE route_name = $1 AND method = $2 AND is_active AND NOT is_deleted
            LIMIT 1
            "#,
        )
        .bind(route_name.as_str())
        .bind(method.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find route by name: {error}")))?;

        row.map(RouteRecord::try_from).transpose()
    }

    pub(super) async fn insert_routes_impl(&self, routes: Vec<NewRoute>) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for route in routes {
            sqlx::query(
                r#"
                INSERT INTO project_routes (uri, method, route_name)
                VALUES ($1, $2, $3)
                ON CONFLICT (uri, method) WHERE is_active AND NOT is_deleted DO NOTHING
                "#,
            )
            .bind(route.uri.as_str())
            .bind(route.method.as_str())
            .bind(route.route_name.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to insert route: {error}")))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
