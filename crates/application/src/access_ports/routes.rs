use async_trait::async_trait;
use routewarden_core::AppResult;
use routewarden_domain::{HttpMethod, RouteId, RouteName, RouteUri};

/// Route ownership row returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Stable route identifier.
    pub id: RouteId,
    /// Lowercased route URI.
    pub uri: RouteUri,
    /// Method the row covers.
    pub method: HttpMethod,
    /// Normalized route name.
    pub route_name: RouteName,
    /// Row is active.
    pub is_active: bool,
    /// Row is soft-deleted.
    pub is_deleted: bool,
}

/// Input row for route ownership inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    /// Lowercased route URI.
    pub uri: RouteUri,
    /// Method the row covers.
    pub method: HttpMethod,
    /// Normalized route name.
    pub route_name: RouteName,
}

/// Repository port for the route ownership table.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Lists every route row regardless of flags.
    async fn list_all(&self) -> AppResult<Vec<RouteRecord>>;

    /// Lists active, non-deleted rows matching any given URI and any given
    /// method. Callers narrow the cross product to exact pairs themselves.
    async fn list_active_by_uris_and_methods(
        &self,
        uris: &[RouteUri],
        methods: &[HttpMethod],
    ) -> AppResult<Vec<RouteRecord>>;

    /// Finds one active, non-deleted row by normalized name and method.
    async fn find_active_by_name_and_method(
        &self,
        route_name: &RouteName,
        method: HttpMethod,
    ) -> AppResult<Option<RouteRecord>>;

    /// Inserts new route rows.
    async fn insert_routes(&self, routes: Vec<NewRoute>) -> AppResult<()>;
}
