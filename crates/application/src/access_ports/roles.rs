use async_trait::async_trait;
use routewarden_core::AppResult;
use routewarden_domain::{RoleCode, RoleId, RoleName};

/// Role catalog row returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Stable role identifier.
    pub id: RoleId,
    /// Role name as declared.
    pub name: String,
    /// Uppercased identity code.
    pub code: RoleCode,
    /// Role weight.
    pub weight: i32,
    /// Row is active.
    pub is_active: bool,
    /// Row is soft-deleted.
    pub is_deleted: bool,
}

/// Input row for catalog inserts. The stored code is always derived from
/// the name, so the pair cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Role name as declared.
    pub name: RoleName,
    /// Role weight.
    pub weight: i32,
}

/// Repository port for the role catalog.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists active, non-deleted roles whose code is in the given set.
    async fn list_active_by_codes(&self, codes: &[RoleCode]) -> AppResult<Vec<RoleRecord>>;

    /// Finds one active, non-deleted role by code.
    async fn find_active_by_code(&self, code: &RoleCode) -> AppResult<Option<RoleRecord>>;

    /// Inserts new catalog rows.
    async fn insert_roles(&self, roles: Vec<NewRole>) -> AppResult<()>;
}
