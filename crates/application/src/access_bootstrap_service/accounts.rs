use super::*;

use crate::NewAccount;

impl AccessBootstrapService {
    /// Upserts every declared bootstrap account with a freshly hashed
    /// credential, re-activating the row if it was disabled.
    pub(crate) async fn seed_accounts(&self, policy: &AccessPolicy) -> AppResult<usize> {
        let mut ensured = 0;

        for account in &policy.accounts {
            let password_hash = self.hasher.hash_password(&account.password)?;
            self.users
                .ensure_account(NewAccount {
                    username: account.username.clone(),
                    email: account.email.clone(),
                    password_hash,
                })
                .await?;
            ensured += 1;
        }

        Ok(ensured)
    }
}
