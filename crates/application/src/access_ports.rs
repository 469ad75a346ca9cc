mod assignments;
mod grants;
mod roles;
mod routes;
mod users;

pub use assignments::{NewUserAssignment, UserAssignmentRepository};
pub use grants::{NewRouteGrant, RouteGrantRepository};
pub use roles::{NewRole, RoleRecord, RoleRepository};
pub use routes::{NewRoute, RouteRecord, RouteRepository};
pub use users::{CredentialHasher, NewAccount, UserDirectory, UserRecord};
