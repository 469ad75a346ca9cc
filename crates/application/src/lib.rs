//! Application services and ports.

#![forbid(unsafe_code)]

mod access_bootstrap_service;
mod access_ports;
mod authorization_service;

pub use access_bootstrap_service::{AccessBootstrapService, BootstrapSummary, StageOutcome};
pub use access_ports::{
    CredentialHasher, NewAccount, NewRole, NewRoute, NewRouteGrant, NewUserAssignment, RoleRecord,
    RoleRepository, RouteGrantRepository, RouteRecord, RouteRepository, UserAssignmentRepository,
    UserDirectory, UserRecord,
};
pub use authorization_service::AuthorizationService;
