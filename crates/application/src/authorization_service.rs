use std::sync::Arc;

use routewarden_core::{AppError, AppResult};
use routewarden_domain::{HttpMethod, RoleId, RouteName, UserId};

use crate::{RouteGrantRepository, RouteRepository, UserAssignmentRepository};

/// Application service answering route authorization questions for request
/// middleware. Pure lookups, no side effects.
#[derive(Clone)]
pub struct AuthorizationService {
    routes: Arc<dyn RouteRepository>,
    grants: Arc<dyn RouteGrantRepository>,
    assignments: Arc<dyn UserAssignmentRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from its repository ports.
    #[must_use]
    pub fn new(
        routes: Arc<dyn RouteRepository>,
        grants: Arc<dyn RouteGrantRepository>,
        assignments: Arc<dyn UserAssignmentRepository>,
    ) -> Self {
        Self {
            routes,
            grants,
            assignments,
        }
    }

    /// Returns whether any of the given roles is granted the route.
    ///
    /// `path` is the registered route template (the router's matched path,
    /// not a concrete request URL), normalized here exactly as seeding
    /// normalizes it. An unknown route, an ungranted route, or an empty
    /// role set all deny.
    pub async fn is_route_allowed(
        &self,
        path: &str,
        method: HttpMethod,
        role_ids: &[RoleId],
    ) -> AppResult<bool> {
        if role_ids.is_empty() {
            return Ok(false);
        }

        let route_name = RouteName::from_path(path);
        let Some(route) = self
            .routes
            .find_active_by_name_and_method(&route_name, method)
            .await?
        else {
            return Ok(false);
        };

        let granted = self.grants.list_role_ids_for_route(route.id).await?;

        Ok(granted.iter().any(|role_id| role_ids.contains(role_id)))
    }

    /// Ensures one of the given roles is granted the route.
    pub async fn require_route(
        &self,
        path: &str,
        method: HttpMethod,
        role_ids: &[RoleId],
    ) -> AppResult<()> {
        if self.is_route_allowed(path, method, role_ids).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "no granted role for {} {path}",
            method.as_str()
        )))
    }

    /// Lists the role ids currently assigned to a user.
    pub async fn roles_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        self.assignments.list_role_ids_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use routewarden_core::{AppError, AppResult};
    use routewarden_domain::{HttpMethod, RoleId, RouteId, RouteName, RouteUri, UserId};
    use tokio::sync::Mutex;

    use crate::{
        NewRoute, NewRouteGrant, NewUserAssignment, RouteGrantRepository, RouteRecord,
        RouteRepository, UserAssignmentRepository,
    };

    use super::AuthorizationService;

    #[derive(Default)]
    struct FakeAccessTables {
        routes: Mutex<Vec<RouteRecord>>,
        grants: Mutex<Vec<NewRouteGrant>>,
        assignments: Mutex<Vec<NewUserAssignment>>,
    }

    #[async_trait]
    impl RouteRepository for FakeAccessTables {
        async fn list_all(&self) -> AppResult<Vec<RouteRecord>> {
            Ok(self.routes.lock().await.clone())
        }

        async fn list_active_by_uris_and_methods(
            &self,
            uris: &[RouteUri],
            methods: &[HttpMethod],
        ) -> AppResult<Vec<RouteRecord>> {
            Ok(self
                .routes
                .lock()
                .await
                .iter()
                .filter(|route| {
                    route.is_active
                        && !route.is_deleted
                        && uris.contains(&route.uri)
                        && methods.contains(&route.method)
                })
                .cloned()
                .collect())
        }

        async fn find_active_by_name_and_method(
            &self,
            route_name: &RouteName,
            method: HttpMethod,
        ) -> AppResult<Option<RouteRecord>> {
            Ok(self
                .routes
                .lock()
                .await
                .iter()
                .find(|route| {
                    route.is_active
                        && !route.is_deleted
                        && route.route_name == *route_name
                        && route.method == method
                })
                .cloned())
        }

        async fn insert_routes(&self, routes: Vec<NewRoute>) -> AppResult<()> {
            let mut stored = self.routes.lock().await;
            for route in routes {
                stored.push(RouteRecord {
                    id: RouteId::new(),
                    uri: route.uri,
                    method: route.method,
                    route_name: route.route_name,
                    is_active: true,
                    is_deleted: false,
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RouteGrantRepository for FakeAccessTables {
        async fn exists(&self, route_id: RouteId, role_id: RoleId) -> AppResult<bool> {
            Ok(self
                .grants
                .lock()
                .await
                .iter()
                .any(|grant| grant.route_id == route_id && grant.role_id == role_id))
        }

        async fn list_role_ids_for_route(&self, route_id: RouteId) -> AppResult<Vec<RoleId>> {
            Ok(self
                .grants
                .lock()
                .await
                .iter()
                .filter(|grant| grant.route_id == route_id)
                .map(|grant| grant.role_id)
                .collect())
        }

        async fn insert_grants(&self, grants: Vec<NewRouteGrant>) -> AppResult<()> {
            self.grants.lock().await.extend(grants);
            Ok(())
        }
    }

    #[async_trait]
    impl UserAssignmentRepository for FakeAccessTables {
        async fn exists(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
            Ok(self
                .assignments
                .lock()
                .await
                .iter()
                .any(|pair| pair.user_id == user_id && pair.role_id == role_id))
        }

        async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
            Ok(self
                .assignments
                .lock()
                .await
                .iter()
                .filter(|pair| pair.user_id == user_id)
                .map(|pair| pair.role_id)
                .collect())
        }

        async fn insert_assignments(&self, assignments: Vec<NewUserAssignment>) -> AppResult<()> {
            self.assignments.lock().await.extend(assignments);
            Ok(())
        }
    }

    fn route_row(path: &str, method: HttpMethod) -> RouteRecord {
        RouteRecord {
            id: RouteId::new(),
            uri: RouteUri::new(path).unwrap_or_else(|_| panic!("test")),
            method,
            route_name: RouteName::from_path(path),
            is_active: true,
            is_deleted: false,
        }
    }

    async fn tables_with_granted_route(
        path: &str,
        method: HttpMethod,
        role_id: RoleId,
    ) -> (Arc<FakeAccessTables>, RouteId) {
        let tables = Arc::new(FakeAccessTables::default());
        let route = route_row(path, method);
        let route_id = route.id;
        tables.routes.lock().await.push(route);
        tables
            .grants
            .lock()
            .await
            .push(NewRouteGrant { route_id, role_id });
        (tables, route_id)
    }

    fn service(tables: Arc<FakeAccessTables>) -> AuthorizationService {
        AuthorizationService::new(tables.clone(), tables.clone(), tables)
    }

    #[tokio::test]
    async fn granted_role_is_allowed() {
        let role_id = RoleId::new();
        let (tables, _) =
            tables_with_granted_route("/admin/motorbike/create", HttpMethod::Post, role_id).await;

        let allowed = service(tables)
            .is_route_allowed("/admin/motorbike/create", HttpMethod::Post, &[role_id])
            .await;
        assert!(allowed.unwrap_or(false));
    }

    #[tokio::test]
    async fn ungranted_role_is_denied() {
        let (tables, _) = tables_with_granted_route(
            "/admin/motorbike/create",
            HttpMethod::Post,
            RoleId::new(),
        )
        .await;

        let allowed = service(tables)
            .is_route_allowed(
                "/admin/motorbike/create",
                HttpMethod::Post,
                &[RoleId::new()],
            )
            .await;
        assert!(!allowed.unwrap_or(true));
    }

    #[tokio::test]
    async fn unknown_route_is_denied() {
        let role_id = RoleId::new();
        let (tables, _) =
            tables_with_granted_route("/admin/motorbike/create", HttpMethod::Post, role_id).await;

        let allowed = service(tables)
            .is_route_allowed("/admin/motorbike/delete", HttpMethod::Post, &[role_id])
            .await;
        assert!(!allowed.unwrap_or(true));
    }

    #[tokio::test]
    async fn wrong_method_is_denied() {
        let role_id = RoleId::new();
        let (tables, _) =
            tables_with_granted_route("/admin/motorbike/create", HttpMethod::Post, role_id).await;

        let allowed = service(tables)
            .is_route_allowed("/admin/motorbike/create", HttpMethod::Get, &[role_id])
            .await;
        assert!(!allowed.unwrap_or(true));
    }

    #[tokio::test]
    async fn empty_role_set_is_denied() {
        let (tables, _) = tables_with_granted_route(
            "/admin/motorbike/create",
            HttpMethod::Post,
            RoleId::new(),
        )
        .await;

        let allowed = service(tables)
            .is_route_allowed("/admin/motorbike/create", HttpMethod::Post, &[])
            .await;
        assert!(!allowed.unwrap_or(true));
    }

    #[tokio::test]
    async fn incoming_path_is_normalized_before_lookup() {
        let role_id = RoleId::new();
        let (tables, _) =
            tables_with_granted_route("/admin/motorbike/create", HttpMethod::Post, role_id).await;

        let allowed = service(tables)
            .is_route_allowed("/Admin/Motorbike/Create/", HttpMethod::Post, &[role_id])
            .await;
        assert!(allowed.unwrap_or(false));
    }

    #[tokio::test]
    async fn inactive_route_is_denied() {
        let role_id = RoleId::new();
        let tables = Arc::new(FakeAccessTables::default());
        let mut route = route_row("/admin/motorbike/create", HttpMethod::Post);
        route.is_active = false;
        let route_id = route.id;
        tables.routes.lock().await.push(route);
        tables
            .grants
            .lock()
            .await
            .push(NewRouteGrant { route_id, role_id });

        let allowed = service(tables)
            .is_route_allowed("/admin/motorbike/create", HttpMethod::Post, &[role_id])
            .await;
        assert!(!allowed.unwrap_or(true));
    }

    #[tokio::test]
    async fn require_route_returns_forbidden_on_deny() {
        let tables = Arc::new(FakeAccessTables::default());

        let result = service(tables)
            .require_route("/admin/motorbike/create", HttpMethod::Post, &[RoleId::new()])
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn roles_for_user_lists_assignments() {
        let tables = Arc::new(FakeAccessTables::default());
        let user_id = UserId::new();
        let role_id = RoleId::new();
        tables
            .assignments
            .lock()
            .await
            .push(NewUserAssignment { user_id, role_id });

        let roles = service(tables).roles_for_user(user_id).await;
        assert_eq!(roles.unwrap_or_default(), vec![role_id]);
    }
}
