//! Declarative access policy document.
//!
//! The policy is a versioned configuration artifact: it declares the role
//! catalog, route-role grants, bootstrap accounts, and credentialed
//! user-role assignments that the reconciliation pipeline converges the
//! store towards.

use routewarden_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::role::{RoleCode, RoleName};
use crate::route::HttpMethod;

/// Role name assigned to eligible users when the policy does not override it.
pub const DEFAULT_ASSIGNMENT_ROLE: &str = "System_User";

/// Access policy document declaring the desired authorization state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Role names the catalog must contain.
    #[serde(default)]
    pub roles: Vec<RoleName>,

    /// Route-role grant declarations.
    #[serde(default)]
    pub grants: Vec<GrantRule>,

    /// Accounts ensured to exist before seeding begins.
    #[serde(default)]
    pub accounts: Vec<BootstrapAccount>,

    /// Credentialed user-role assignment declarations.
    #[serde(default)]
    pub assignments: Vec<AssignmentRule>,

    /// Role assigned to eligible users; `System_User` when absent.
    #[serde(default)]
    pub default_assignment_role: Option<RoleName>,
}

impl AccessPolicy {
    /// Parses and validates a policy from its JSON document.
    pub fn from_json(document: &str) -> AppResult<Self> {
        let policy: Self = serde_json::from_str(document).map_err(|error| {
            AppError::Validation(format!("invalid access policy document: {error}"))
        })?;
        policy.validate()?;

        Ok(policy)
    }

    /// Returns the code of the role used for user assignments.
    pub fn assignment_role_code(&self) -> AppResult<RoleCode> {
        match &self.default_assignment_role {
            Some(name) => Ok(name.code()),
            None => RoleName::new(DEFAULT_ASSIGNMENT_ROLE).map(|name| name.code()),
        }
    }

    /// Re-checks fields that bypass constructor validation during
    /// deserialization.
    fn validate(&self) -> AppResult<()> {
        for name in &self.roles {
            ensure_role_name(name, "roles")?;
        }

        for grant in &self.grants {
            ensure_role_name(&grant.role, "grants")?;
            if grant.route.trim().is_empty() {
                return Err(AppError::Validation(
                    "grant route must not be blank".to_owned(),
                ));
            }
        }

        for account in &self.accounts {
            if account.username.trim().is_empty() {
                return Err(AppError::Validation(
                    "account username must not be blank".to_owned(),
                ));
            }
        }

        for assignment in &self.assignments {
            if assignment.username.trim().is_empty() {
                return Err(AppError::Validation(
                    "assignment username must not be blank".to_owned(),
                ));
            }
        }

        if let Some(name) = &self.default_assignment_role {
            ensure_role_name(name, "default_assignment_role")?;
        }

        Ok(())
    }
}

fn ensure_role_name(name: &RoleName, context: &str) -> AppResult<()> {
    if name.as_str().trim().is_empty() {
        return Err(AppError::Validation(format!(
            "role name in {context} must not be blank"
        )));
    }

    Ok(())
}

/// Declares that a role may invoke a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRule {
    /// Route path as declared; matched case-insensitively against seeded URIs.
    pub route: String,
    /// Role name; matched by uppercased code.
    pub role: RoleName,
    /// Method the grant applies to.
    pub method: HttpMethod,
}

/// Account ensured to exist before the seeding stages run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapAccount {
    /// Login name; the upsert key.
    pub username: String,
    /// Contact address stored on the account row.
    pub email: String,
    /// Plaintext password, hashed before it reaches the store.
    pub password: String,
}

/// Declares that the user holding these credentials receives the default
/// assignment role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRule {
    /// Login name of the user to assign.
    pub username: String,
    /// Plaintext password that must match the stored hash.
    pub password: String,
}
