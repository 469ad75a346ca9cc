use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use routewarden_domain::{GrantRule, HttpMethod, RoleCode, RoleId, RouteId, RouteUri};
use tracing::warn;

use super::*;

use crate::NewRouteGrant;

/// Resolution of one declared grant triple against the live tables.
enum GrantResolution {
    Resolved(NewRouteGrant),
    RouteNotFound,
    RoleNotFound,
}

impl AccessBootstrapService {
    /// Inserts declared route-role grants whose referents resolve and whose
    /// pair is not yet present.
    pub(crate) async fn seed_grants(&self, policy: &AccessPolicy) -> AppResult<usize> {
        if policy.grants.is_empty() {
            return Ok(0);
        }

        let route_index = self.load_route_index(&policy.grants).await?;
        let role_index = self.load_role_index(&policy.grants).await?;

        let mut resolved = Vec::new();
        let mut route_misses = 0usize;
        let mut role_misses = 0usize;
        for grant in &policy.grants {
            match resolve_grant(grant, &route_index, &role_index)? {
                GrantResolution::Resolved(pair) => resolved.push(pair),
                GrantResolution::RouteNotFound => route_misses += 1,
                GrantResolution::RoleNotFound => role_misses += 1,
            }
        }

        if route_misses > 0 || role_misses > 0 {
            warn!(route_misses, role_misses, "grant declarations left unresolved");
        }

        let queued = self.queue_missing_grants(resolved).await?;
        if queued.is_empty() {
            return Ok(0);
        }

        let inserted = queued.len();
        self.grants.insert_grants(queued).await?;

        Ok(inserted)
    }

    /// Prefetches active routes for every declared URI and method, indexed
    /// by the exact (uri, method) pair.
    async fn load_route_index(
        &self,
        grants: &[GrantRule],
    ) -> AppResult<HashMap<(RouteUri, HttpMethod), RouteId>> {
        let mut uris = Vec::new();
        let mut methods = Vec::new();
        for grant in grants {
            let uri = RouteUri::new(&grant.route)?;
            if !uris.contains(&uri) {
                uris.push(uri);
            }
            if !methods.contains(&grant.method) {
                methods.push(grant.method);
            }
        }

        let routes = self
            .routes
            .list_active_by_uris_and_methods(&uris, &methods)
            .await?;

        Ok(routes
            .into_iter()
            .map(|route| ((route.uri, route.method), route.id))
            .collect())
    }

    /// Prefetches active roles for every declared role code.
    async fn load_role_index(&self, grants: &[GrantRule]) -> AppResult<HashMap<RoleCode, RoleId>> {
        let mut codes: Vec<RoleCode> = Vec::new();
        for grant in grants {
            let code = grant.role.code();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        let roles = self.roles.list_active_by_codes(&codes).await?;

        Ok(roles.into_iter().map(|role| (role.code, role.id)).collect())
    }

    /// Checks every resolved pair concurrently, then returns the pairs that
    /// still need inserting, deduplicated in declaration order.
    async fn queue_missing_grants(
        &self,
        resolved: Vec<NewRouteGrant>,
    ) -> AppResult<Vec<NewRouteGrant>> {
        let mut seen = HashSet::new();
        let unique: Vec<NewRouteGrant> = resolved
            .into_iter()
            .filter(|pair| seen.insert(*pair))
            .collect();

        let checks = join_all(
            unique
                .iter()
                .map(|pair| self.grants.exists(pair.route_id, pair.role_id)),
        )
        .await;

        let mut missing = Vec::new();
        for (pair, exists) in unique.into_iter().zip(checks) {
            if !exists? {
                missing.push(pair);
            }
        }

        Ok(missing)
    }
}

fn resolve_grant(
    grant: &GrantRule,
    route_index: &HashMap<(RouteUri, HttpMethod), RouteId>,
    role_index: &HashMap<RoleCode, RoleId>,
) -> AppResult<GrantResolution> {
    let uri = RouteUri::new(&grant.route)?;

    let Some(route_id) = route_index.get(&(uri, grant.method)).copied() else {
        return Ok(GrantResolution::RouteNotFound);
    };
    let Some(role_id) = role_index.get(&grant.role.code()).copied() else {
        return Ok(GrantResolution::RoleNotFound);
    };

    Ok(GrantResolution::Resolved(NewRouteGrant { route_id, role_id }))
}
