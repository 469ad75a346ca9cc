mod accounts;
mod assignments;
mod grants;
mod roles;
mod routes;

use std::sync::Arc;

use routewarden_core::AppResult;
use routewarden_domain::{AccessPolicy, RegisteredRoute};
use tracing::{error, info};

use crate::{
    CredentialHasher, RoleRepository, RouteGrantRepository, RouteRepository,
    UserAssignmentRepository, UserDirectory,
};

/// Outcome of one reconciliation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage wrote missing rows.
    Seeded {
        /// Number of rows written.
        inserted: usize,
    },
    /// Nothing was missing.
    UpToDate,
    /// The stage failed; the error was logged and swallowed.
    Failed,
}

/// Per-stage outcomes of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapSummary {
    /// Bootstrap account upserts.
    pub accounts: StageOutcome,
    /// Role catalog reconciliation.
    pub roles: StageOutcome,
    /// Route ownership reconciliation.
    pub routes: StageOutcome,
    /// Route-role grant reconciliation.
    pub grants: StageOutcome,
    /// User-role assignment reconciliation.
    pub assignments: StageOutcome,
}

/// Reconciliation engine: converges the store towards the access policy by
/// inserting whatever is missing, never removing anything.
#[derive(Clone)]
pub struct AccessBootstrapService {
    users: Arc<dyn UserDirectory>,
    roles: Arc<dyn RoleRepository>,
    routes: Arc<dyn RouteRepository>,
    grants: Arc<dyn RouteGrantRepository>,
    assignments: Arc<dyn UserAssignmentRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccessBootstrapService {
    /// Creates the engine from its repository and hasher ports.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        roles: Arc<dyn RoleRepository>,
        routes: Arc<dyn RouteRepository>,
        grants: Arc<dyn RouteGrantRepository>,
        assignments: Arc<dyn UserAssignmentRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            roles,
            routes,
            grants,
            assignments,
            hasher,
        }
    }

    /// Runs the full pipeline once: accounts, roles, routes, grants,
    /// assignments, in that order.
    ///
    /// Each stage awaits the previous stage's writes. A stage failure is
    /// logged and swallowed so the later stages still run against whatever
    /// state exists; `run` itself never fails.
    pub async fn run(
        &self,
        policy: &AccessPolicy,
        registered_routes: &[RegisteredRoute],
    ) -> BootstrapSummary {
        let accounts = report("bootstrap accounts", self.seed_accounts(policy).await);
        let roles = report("role catalog", self.seed_roles(policy).await);
        let routes = report("route ownership", self.seed_routes(registered_routes).await);
        let grants = report("route-role grants", self.seed_grants(policy).await);
        let assignments = report("user-role assignments", self.seed_assignments(policy).await);

        BootstrapSummary {
            accounts,
            roles,
            routes,
            grants,
            assignments,
        }
    }
}

/// Maps a stage result onto its outcome and log line.
fn report(stage: &'static str, result: AppResult<usize>) -> StageOutcome {
    match result {
        Ok(0) => {
            info!(stage, "stage up to date");
            StageOutcome::UpToDate
        }
        Ok(inserted) => {
            info!(stage, inserted, "stage seeded");
            StageOutcome::Seeded { inserted }
        }
        Err(error) => {
            error!(stage, %error, "stage failed");
            StageOutcome::Failed
        }
    }
}
