//! PostgreSQL-backed access control tables.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use routewarden_application::{
    NewRole, NewRoute, NewRouteGrant, NewUserAssignment, RoleRecord, RoleRepository, RouteGrantRepository,
    RouteRecord, RouteRepository, UserAssignmentRepository,
};
use routewarden_core::{AppError, AppResult};
use routewarden_domain::{HttpMethod, RoleCode, RoleId, RouteId, RouteName, RouteUri, UserId};

/// PostgreSQL implementation of the role, route, grant, and assignment ports.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    code: String,
    weight: i32,
    is_active: bool,
    is_deleted: bool,
}

impl TryFrom<RoleRow> for RoleRecord {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let code = RoleCode::new(row.code.as_str())
            .map_err(|error| AppError::Internal(format!("invalid stored role code: {error}")))?;

        Ok(Self {
            id: RoleId::from_uuid(row.id),
            name: row.name,
            code,
            weight: row.weight,
            is_active: row.is_active,
            is_deleted: row.is_deleted,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RouteRow {
    id: uuid::Uuid,
    uri: String,
    method: String,
    route_name: String,
    is_active: bool,
    is_deleted: bool,
}

impl TryFrom<RouteRow> for RouteRecord {
    type Error = AppError;

    fn try_from(row: RouteRow) -> Result<Self, Self::Error> {
        let uri = RouteUri::new(row.uri.as_str())
            .map_err(|error| AppError::Internal(format!("invalid stored route uri: {error}")))?;
        let method = HttpMethod::from_str(row.method.as_str())
            .map_err(|error| AppError::Internal(format!("invalid stored route method: {error}")))?;

        Ok(Self {
            id: RouteId::from_uuid(row.id),
            uri,
            method,
            route_name: RouteName::from_path(row.route_name.as_str()),
            is_active: row.is_active,
            is_deleted: row.is_deleted,
        })
    }
}

mod assignments;
mod grants;
mod roles;
mod routes;


#[async_trait]
impl RoleRepository for PostgresAccessRepository {
    async fn list_active_by_codes(&self, codes: &[RoleCode]) -> AppResult<Vec<RoleRecord>> {
        self.list_active_roles_by_codes_impl(codes).await
    }

    async fn find_active_by_code(&self, code: &RoleCode) -> AppResult<Option<RoleRecord>> {
        self.find_active_role_by_code_impl(code).await
    }

    async fn insert_roles(&self, roles: Vec<NewRole>) -> AppResult<()> {
        self.insert_roles_impl(roles).await
    }
}

#[async_trait]
impl RouteRepository for PostgresAccessRepository {
    async fn list_all(&self) -> AppResult<Vec<RouteRecord>> {
        self.list_all_routes_impl().await
    }

    async fn list_active_by_uris_and_methods(
        &self,
        uris: &[RouteUri],
        methods: &[HttpMethod],
    ) -> AppResult<Vec<RouteRecord>> {
        self.list_active_routes_by_uris_and_methods_impl(uris, methods)
            .await
    }

    async fn find_active_by_name_and_method(
        &self,
        route_name: &RouteName,
        method: HttpMethod,
    ) -> AppResult<Option<RouteRecord>> {
        self.find_active_route_by_name_and_method_impl(route_name, method)
            .await
    }

    async fn insert_routes(&self, routes: Vec<NewRoute>) -> AppResult<()> {
        self.insert_routes_impl(routes).await
    }
}

#[async_trait]
impl RouteGrantRepository for PostgresAccessRepository {
    async fn exists(&self, route_id: RouteId, role_id: RoleId) -> AppResult<bool> {
        self.grant_exists_impl(route_id, role_id).await
    }

    async fn list_role_ids_for_route(&self, route_id: RouteId) -> AppResult<Vec<RoleId>> {
        self.list_role_ids_for_route_impl(route_id).await
    }

    async fn insert_grants(&self, grants: Vec<NewRouteGrant>) -> AppResult<()> {
        self.insert_grants_impl(grants).await
    }
}

#[async_trait]
impl UserAssignmentRepository for PostgresAccessRepository {
    async fn exists(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        self.assignment_exists_impl(user_id, role_id).await
    }

    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        self.list_role_ids_for_user_impl(user_id).await
    }

    async fn insert_assignments(&self, assignments: Vec<NewUserAssignment>) -> AppResult<()> {
        self.insert_assignments_impl(assignments).await
    }
}
