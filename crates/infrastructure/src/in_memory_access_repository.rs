use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use routewarden_application::{
    NewAccount, NewRole, NewRoute, NewRouteGrant, NewUserAssignment, RoleRecord, RoleRepository,
    RouteGrantRepository, RouteRecord, RouteRepository, UserAssignmentRepository, UserDirectory,
    UserRecord,
};
use routewarden_core::AppResult;
use routewarden_domain::{HttpMethod, RoleCode, RoleId, RouteId, RouteName, RouteUri, UserId};
use tokio::sync::RwLock;

/// In-memory access control store.
///
/// Implements every persistence port the seeding pipeline and the route
/// authorization predicate use, so both can run without Postgres. Insert
/// behavior mirrors the database constraints: live role codes and live
/// uri-method pairs are unique, and join rows deduplicate on their pair.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
    roles: RwLock<HashMap<RoleId, RoleRecord>>,
    routes: RwLock<HashMap<RouteId, RouteRecord>>,
    grants: RwLock<HashSet<(RouteId, RoleId)>>,
    assignments: RwLock<HashSet<(UserId, RoleId)>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashMap::new()),
            routes: RwLock::new(HashMap::new()),
            grants: RwLock::new(HashSet::new()),
            assignments: RwLock::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryAccessRepository {
    async fn find_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<UserRecord>> {
        let users = self.users.read().await;

        let mut found: Vec<UserRecord> = users
            .values()
            .filter(|user| usernames.contains(&user.username))
            .cloned()
            .collect();
        found.sort_by(|left, right| left.username.cmp(&right.username));

        Ok(found)
    }

    async fn ensure_account(&self, account: NewAccount) -> AppResult<()> {
        let mut users = self.users.write().await;

        if let Some(user) = users
            .values_mut()
            .find(|user| user.username == account.username)
        {
            user.password_hash = account.password_hash;
            user.is_active = true;
            user.is_deleted = false;
            return Ok(());
        }

        let id = UserId::new();
        users.insert(
            id,
            UserRecord {
                id,
                username: account.username,
                password_hash: account.password_hash,
                is_active: true,
                is_deleted: false,
            },
        );

        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryAccessRepository {
    async fn list_active_by_codes(&self, codes: &[RoleCode]) -> AppResult<Vec<RoleRecord>> {
        let roles = self.roles.read().await;

        let mut listed: Vec<RoleRecord> = roles
            .values()
            .filter(|role| role.is_active && !role.is_deleted && codes.contains(&role.code))
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.code.as_str().cmp(right.code.as_str()));

        Ok(listed)
    }

    async fn find_active_by_code(&self, code: &RoleCode) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.is_active && !role.is_deleted && role.code == *code)
            .cloned())
    }

    async fn insert_roles(&self, roles: Vec<NewRole>) -> AppResult<()> {
        let mut stored = self.roles.write().await;

        for role in roles {
            let code = role.name.code();
            let live_code_taken = stored
                .values()
                .any(|existing| existing.is_active && !existing.is_deleted && existing.code == code);
            if live_code_taken {
                continue;
            }

            let id = RoleId::new();
            stored.insert(
                id,
                RoleRecord {
                    id,
                    name: role.name.as_str().to_owned(),
                    code,
                    weight: role.weight,
                    is_active: true,
                    is_deleted: false,
                },
            );
        }

        Ok(())
    }
}

#[async_trait]
impl RouteRepository for InMemoryAccessRepository {
    async fn list_all(&self) -> AppResult<Vec<RouteRecord>> {
        let routes = self.routes.read().await;

        let mut listed: Vec<RouteRecord> = routes.values().cloned().collect();
        listed.sort_by(|left, right| {
            left.uri
                .as_str()
                .cmp(right.uri.as_str())
                .then_with(|| left.method.as_str().cmp(right.method.as_str()))
        });

        Ok(listed)
    }

    async fn list_active_by_uris_and_methods(
        &self,
        uris: &[RouteUri],
        methods: &[HttpMethod],
    ) -> AppResult<Vec<RouteRecord>> {
        let routes = self.routes.read().await;

        let mut listed: Vec<RouteRecord> = routes
            .values()
            .filter(|route| {
                route.is_active
                    && !route.is_deleted
                    && uris.contains(&route.uri)
                    && methods.contains(&route.method)
            })
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            left.uri
                .as_str()
                .cmp(right.uri.as_str())
                .then_with(|| left.method.as_str().cmp(right.method.as_str()))
        });

        Ok(listed)
    }

    async fn find_active_by_name_and_method(
        &self,
        route_name: &RouteName,
        method: HttpMethod,
    ) -> AppResult<Option<RouteRecord>> {
        Ok(self
            .routes
            .read()
            .await
            .values()
            .find(|route| {
                route.is_active
                    && !route.is_deleted
                    && route.route_name == *route_name
                    && route.method == method
            })
            .cloned())
    }

    async fn insert_routes(&self, routes: Vec<NewRoute>) -> AppResult<()> {
        let mut stored = self.routes.write().await;

        for route in routes {
            let live_pair_taken = stored.values().any(|existing| {
                existing.is_active
                    && !existing.is_deleted
                    && existing.uri == route.uri
                    && existing.method == route.method
            });
            if live_pair_taken {
                continue;
            }

            let id = RouteId::new();
            stored.insert(
                id,
                RouteRecord {
                    id,
                    uri: route.uri,
                    method: route.method,
                    route_name: route.route_name,
                    is_active: true,
                    is_deleted: false,
                },
            );
        }

        Ok(())
    }
}

#[async_trait]
impl RouteGrantRepository for InMemoryAccessRepository {
    async fn exists(&self, route_id: RouteId, role_id: RoleId) -> AppResult<bool> {
        Ok(self.grants.read().await.contains(&(route_id, role_id)))
    }

    async fn list_role_ids_for_route(&self, route_id: RouteId) -> AppResult<Vec<RoleId>> {
        let grants = self.grants.read().await;

        let mut ids: Vec<RoleId> = grants
            .iter()
            .filter(|(stored_route_id, _)| *stored_route_id == route_id)
            .map(|(_, role_id)| *role_id)
            .collect();
        ids.sort_by_key(RoleId::as_uuid);

        Ok(ids)
    }

    async fn insert_grants(&self, grants: Vec<NewRouteGrant>) -> AppResult<()> {
        let mut stored = self.grants.write().await;
        for grant in grants {
            stored.insert((grant.route_id, grant.role_id));
        }

        Ok(())
    }
}

#[async_trait]
impl UserAssignmentRepository for InMemoryAccessRepository {
    async fn exists(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        Ok(self.assignments.read().await.contains(&(user_id, role_id)))
    }

    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        let assignments = self.assignments.read().await;

        let mut ids: Vec<RoleId> = assignments
            .iter()
            .filter(|(stored_user_id, _)| *stored_user_id == user_id)
            .map(|(_, role_id)| *role_id)
            .collect();
        ids.sort_by_key(RoleId::as_uuid);

        Ok(ids)
    }

    async fn insert_assignments(&self, assignments: Vec<NewUserAssignment>) -> AppResult<()> {
        let mut stored = self.assignments.write().await;
        for assignment in assignments {
            stored.insert((assignment.user_id, assignment.role_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use routewarden_application::{
        AccessBootstrapService, AuthorizationService, StageOutcome, UserDirectory,
    };
    use routewarden_domain::{AccessPolicy, HttpMethod, RouteManifest};

    use crate::Argon2CredentialHasher;

    use super::InMemoryAccessRepository;

    const POLICY_DOCUMENT: &str = r#"{
        "roles": ["User", "Admin", "System_User"],
        "grants": [
            {"route": "/admin/motorbike/create", "role": "Admin", "method": "POST"},
            {"route": "/reports/daily", "role": "System_User", "method": "GET"}
        ],
        "accounts": [
            {"username": "Andrew", "email": "andrew@example.test", "password": "123"}
        ],
        "assignments": [
            {"username": "Andrew", "password": "123"}
        ]
    }"#;

    const MANIFEST_DOCUMENT: &str = r#"{
        "routes": [
            {"path": "/admin/motorbike/create", "methods": ["POST"]},
            {"path": "/reports/daily", "methods": ["GET"]}
        ]
    }"#;

    fn seeder(store: &Arc<InMemoryAccessRepository>) -> AccessBootstrapService {
        AccessBootstrapService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(Argon2CredentialHasher::new()),
        )
    }

    #[tokio::test]
    async fn bootstrap_then_authorize_round_trip() {
        let store = Arc::new(InMemoryAccessRepository::new());
        let policy = AccessPolicy::from_json(POLICY_DOCUMENT).unwrap_or_else(|_| unreachable!());
        let manifest =
            RouteManifest::from_json(MANIFEST_DOCUMENT).unwrap_or_else(|_| unreachable!());

        let summary = seeder(&store).run(&policy, &manifest.routes).await;
        assert_eq!(summary.accounts, StageOutcome::Seeded { inserted: 1 });
        assert_eq!(summary.roles, StageOutcome::Seeded { inserted: 3 });
        assert_eq!(summary.routes, StageOutcome::Seeded { inserted: 2 });
        assert_eq!(summary.grants, StageOutcome::Seeded { inserted: 2 });
        assert_eq!(summary.assignments, StageOutcome::Seeded { inserted: 1 });

        let users = store.find_by_usernames(&["Andrew".to_owned()]).await;
        assert!(users.is_ok());
        let users = users.unwrap_or_default();
        assert_eq!(users.len(), 1);

        let authorizer =
            AuthorizationService::new(store.clone(), store.clone(), store.clone());
        let roles = authorizer.roles_for_user(users[0].id).await;
        assert!(roles.is_ok());
        let roles = roles.unwrap_or_default();
        assert_eq!(roles.len(), 1);

        let allowed = authorizer
            .is_route_allowed("/reports/daily", HttpMethod::Get, &roles)
            .await;
        assert!(allowed.unwrap_or(false));

        let denied = authorizer
            .is_route_allowed("/admin/motorbike/create", HttpMethod::Post, &roles)
            .await;
        assert!(!denied.unwrap_or(true));
    }

    #[tokio::test]
    async fn second_bootstrap_run_reports_up_to_date() {
        let store = Arc::new(InMemoryAccessRepository::new());
        let policy = AccessPolicy::from_json(POLICY_DOCUMENT).unwrap_or_else(|_| unreachable!());
        let manifest =
            RouteManifest::from_json(MANIFEST_DOCUMENT).unwrap_or_else(|_| unreachable!());
        let engine = seeder(&store);

        engine.run(&policy, &manifest.routes).await;
        let second = engine.run(&policy, &manifest.routes).await;

        assert_eq!(second.accounts, StageOutcome::Seeded { inserted: 1 });
        assert_eq!(second.roles, StageOutcome::UpToDate);
        assert_eq!(second.routes, StageOutcome::UpToDate);
        assert_eq!(second.grants, StageOutcome::UpToDate);
        assert_eq!(second.assignments, StageOutcome::UpToDate);
    }
}
