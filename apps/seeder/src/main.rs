//! Routewarden authorization seeder runtime.
//!
//! Reads the access policy and route manifest documents, converges the
//! database towards them, and exits. Stage failures are logged by the
//! pipeline and never abort the remaining stages, so reruns after a
//! partial failure pick up exactly the rows that are still missing.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;

use routewarden_application::AccessBootstrapService;
use routewarden_core::{AppError, AppResult};
use routewarden_domain::{AccessPolicy, RouteManifest};
use routewarden_infrastructure::{
    Argon2CredentialHasher, PostgresAccessRepository, PostgresUserDirectory,
};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct SeederConfig {
    database_url: String,
    policy_path: String,
    manifest_path: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SeederConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    let policy = AccessPolicy::from_json(read_document(config.policy_path.as_str())?.as_str())?;
    let manifest = RouteManifest::from_json(read_document(config.manifest_path.as_str())?.as_str())?;

    info!(
        policy_path = %config.policy_path,
        manifest_path = %config.manifest_path,
        declared_roles = policy.roles.len(),
        declared_grants = policy.grants.len(),
        declared_accounts = policy.accounts.len(),
        declared_assignments = policy.assignments.len(),
        registered_routes = manifest.routes.len(),
        "routewarden-seeder started"
    );

    let summary = build_bootstrap_service(pool)
        .run(&policy, &manifest.routes)
        .await;

    info!(
        accounts = ?summary.accounts,
        roles = ?summary.roles,
        routes = ?summary.routes,
        grants = ?summary.grants,
        assignments = ?summary.assignments,
        "authorization seeding finished"
    );

    Ok(())
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn build_bootstrap_service(pool: PgPool) -> AccessBootstrapService {
    let directory = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let access = Arc::new(PostgresAccessRepository::new(pool));

    AccessBootstrapService::new(
        directory,
        access.clone(),
        access.clone(),
        access.clone(),
        access,
        Arc::new(Argon2CredentialHasher::new()),
    )
}

fn read_document(path: &str) -> AppResult<String> {
    std::fs::read_to_string(path)
        .map_err(|error| AppError::Internal(format!("failed to read '{path}': {error}")))
}

impl SeederConfig {
    fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let policy_path =
            env::var("ACCESS_POLICY_PATH").unwrap_or_else(|_| "policy/access_policy.json".to_owned());
        let manifest_path = env::var("ROUTE_MANIFEST_PATH")
            .unwrap_or_else(|_| "policy/route_manifest.json".to_owned());

        Ok(Self {
            database_url,
            policy_path,
            manifest_path,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
