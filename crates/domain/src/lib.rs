//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod policy;
mod role;
mod route;
mod user;

pub use policy::{
    AccessPolicy, AssignmentRule, BootstrapAccount, DEFAULT_ASSIGNMENT_ROLE, GrantRule,
};
pub use role::{DEFAULT_ROLE_WEIGHT, RoleCode, RoleId, RoleName};
pub use route::{HttpMethod, RegisteredRoute, RouteId, RouteManifest, RouteName, RouteUri};
pub use user::UserId;
