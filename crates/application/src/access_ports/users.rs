use async_trait::async_trait;
use routewarden_core::AppResult;
use routewarden_domain::UserId;

/// User row projection as the assignment stage needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Stored credential hash.
    pub password_hash: String,
    /// Row is active.
    pub is_active: bool,
    /// Row is soft-deleted.
    pub is_deleted: bool,
}

/// Account upserted before the seeding stages run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Unique login name; the upsert key.
    pub username: String,
    /// Contact address stored on the row.
    pub email: String,
    /// Credential hash produced by the hasher port.
    pub password_hash: String,
}

/// Directory port over the external user table.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Lists users whose username is in the given set.
    async fn find_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<UserRecord>>;

    /// Inserts the account or refreshes its email and hash, re-activating
    /// the row either way.
    async fn ensure_account(&self, account: NewAccount) -> AppResult<()>;
}

/// Port for password hashing and verification.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password for storage.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; `Err` is reserved for malformed input.
    fn verify_password(&self, password: &str, stored_hash: &str) -> AppResult<bool>;
}
