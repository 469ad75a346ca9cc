use async_trait::async_trait;
use routewarden_core::AppResult;
use routewarden_domain::{RoleId, RouteId};

/// Missing route-role grant queued for insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NewRouteGrant {
    /// Route receiving the grant.
    pub route_id: RouteId,
    /// Role being granted.
    pub role_id: RoleId,
}

/// Repository port for the route-role grant table.
#[async_trait]
pub trait RouteGrantRepository: Send + Sync {
    /// Returns whether a grant row exists for the pair.
    async fn exists(&self, route_id: RouteId, role_id: RoleId) -> AppResult<bool>;

    /// Lists the role ids granted to a route.
    async fn list_role_ids_for_route(&self, route_id: RouteId) -> AppResult<Vec<RoleId>>;

    /// Inserts grant rows in one batch.
    async fn insert_grants(&self, grants: Vec<NewRouteGrant>) -> AppResult<()>;
}
