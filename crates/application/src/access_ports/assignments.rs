use async_trait::async_trait;
use routewarden_core::AppResult;
use routewarden_domain::{RoleId, UserId};

/// Missing user-role assignment queued for insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NewUserAssignment {
    /// User receiving the role.
    pub user_id: UserId,
    /// Role being assigned.
    pub role_id: RoleId,
}

/// Repository port for the user-role assignment table.
#[async_trait]
pub trait UserAssignmentRepository: Send + Sync {
    /// Returns whether an assignment row exists for the pair.
    async fn exists(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;

    /// Lists the role ids assigned to a user.
    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>>;

    /// Inserts assignment rows in one batch.
    async fn insert_assignments(&self, assignments: Vec<NewUserAssignment>) -> AppResult<()>;
}
