//! Role catalog types.
//!
//! A role is a named permission group. Its storage code is always the
//! uppercased name, and the catalog treats the code as the identity key.

use std::fmt::{Display, Formatter};

use routewarden_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight given to every role created by reconciliation.
pub const DEFAULT_ROLE_WEIGHT: i32 = 1;

/// Unique identifier for a role row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Declared role name, as written in the policy document (for example
/// `System_User`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the declared name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the storage code for this name (uppercased).
    #[must_use]
    pub fn code(&self) -> RoleCode {
        RoleCode(self.0.to_uppercase())
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Uppercased role code used as the catalog identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleCode(String);

impl RoleCode {
    /// Creates a role code, uppercasing the given value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "role code must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_name_keeps_declared_casing() {
        let name = RoleName::new("System_User").unwrap_or_else(|_| panic!("test"));
        assert_eq!(name.as_str(), "System_User");
    }

    #[test]
    fn role_code_is_uppercased_name() {
        let name = RoleName::new("System_User").unwrap_or_else(|_| panic!("test"));
        assert_eq!(name.code().as_str(), "SYSTEM_USER");
    }

    #[test]
    fn role_code_uppercases_input() {
        let code = RoleCode::new("admin").unwrap_or_else(|_| panic!("test"));
        assert_eq!(code.as_str(), "ADMIN");
    }

    #[test]
    fn blank_role_name_is_rejected() {
        assert!(RoleName::new("   ").is_err());
    }

    #[test]
    fn blank_role_code_is_rejected() {
        assert!(RoleCode::new("").is_err());
    }
}
