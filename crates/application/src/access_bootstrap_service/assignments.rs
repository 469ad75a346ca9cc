use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use routewarden_core::AppError;
use routewarden_domain::{AssignmentRule, UserId};
use tracing::warn;

use super::*;

use crate::{NewUserAssignment, UserRecord};

impl AccessBootstrapService {
    /// Assigns the default role to every declared user passing the
    /// credential gate, inserting only the missing assignment rows.
    pub(crate) async fn seed_assignments(&self, policy: &AccessPolicy) -> AppResult<usize> {
        if policy.assignments.is_empty() {
            return Ok(0);
        }

        let role_code = policy.assignment_role_code()?;
        let Some(default_role) = self.roles.find_active_by_code(&role_code).await? else {
            return Err(AppError::NotFound(format!(
                "default assignment role '{role_code}' is not in the catalog"
            )));
        };

        let usernames: Vec<String> = policy
            .assignments
            .iter()
            .map(|rule| rule.username.clone())
            .collect();
        let users = self.users.find_by_usernames(&usernames).await?;
        let users_by_name: HashMap<&str, &UserRecord> = users
            .iter()
            .map(|user| (user.username.as_str(), user))
            .collect();

        let mut eligible = Vec::new();
        let mut skipped = 0usize;
        for rule in &policy.assignments {
            match self.gate_assignment(rule, &users_by_name) {
                Some(user_id) => eligible.push(NewUserAssignment {
                    user_id,
                    role_id: default_role.id,
                }),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "assignment declarations failed the credential gate");
        }

        let queued = self.queue_missing_assignments(eligible).await?;
        if queued.is_empty() {
            return Ok(0);
        }

        let inserted = queued.len();
        self.assignments.insert_assignments(queued).await?;

        Ok(inserted)
    }

    /// Credential gate: the user must exist, be active, non-deleted, and
    /// the declared plaintext must match the stored hash. A verification
    /// error fails closed.
    fn gate_assignment(
        &self,
        rule: &AssignmentRule,
        users_by_name: &HashMap<&str, &UserRecord>,
    ) -> Option<UserId> {
        let user = users_by_name.get(rule.username.as_str())?;
        if !user.is_active || user.is_deleted {
            return None;
        }

        match self
            .hasher
            .verify_password(&rule.password, &user.password_hash)
        {
            Ok(true) => Some(user.id),
            Ok(false) => None,
            Err(error) => {
                warn!(username = %rule.username, %error, "credential verification failed");
                None
            }
        }
    }

    /// Checks every eligible pair concurrently, then returns the pairs that
    /// still need inserting, deduplicated in declaration order.
    async fn queue_missing_assignments(
        &self,
        eligible: Vec<NewUserAssignment>,
    ) -> AppResult<Vec<NewUserAssignment>> {
        let mut seen = HashSet::new();
        let unique: Vec<NewUserAssignment> = eligible
            .into_iter()
            .filter(|pair| seen.insert(*pair))
            .collect();

        let checks = join_all(
            unique
                .iter()
                .map(|pair| self.assignments.exists(pair.user_id, pair.role_id)),
        )
        .await;

        let mut missing = Vec::new();
        for (pair, exists) in unique.into_iter().zip(checks) {
            if !exists? {
                missing.push(pair);
            }
        }

        Ok(missing)
    }
}
