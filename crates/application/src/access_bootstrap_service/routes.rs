use std::collections::HashSet;

use routewarden_domain::{HttpMethod, RouteName, RouteUri};

use super::*;

use crate::NewRoute;

impl AccessBootstrapService {
    /// Inserts registered (path, method) pairs not yet in the ownership
    /// table, keyed by normalized name and method.
    pub(crate) async fn seed_routes(&self, registered: &[RegisteredRoute]) -> AppResult<usize> {
        if registered.is_empty() {
            return Ok(0);
        }

        let existing = self.routes.list_all().await?;
        let mut seen: HashSet<(RouteName, HttpMethod)> = existing
            .into_iter()
            .map(|route| (route.route_name, route.method))
            .collect();

        let mut missing = Vec::new();
        for route in registered {
            let uri = RouteUri::new(&route.path)?;
            let route_name = RouteName::from_path(&route.path);

            for method in &route.methods {
                if seen.insert((route_name.clone(), *method)) {
                    missing.push(NewRoute {
                        uri: uri.clone(),
                        method: *method,
                        route_name: route_name.clone(),
                    });
                }
            }
        }

        if missing.is_empty() {
            return Ok(0);
        }

        let inserted = missing.len();
        self.routes.insert_routes(missing).await?;

        Ok(inserted)
    }
}
