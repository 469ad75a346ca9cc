use std::collections::HashSet;

use routewarden_domain::{DEFAULT_ROLE_WEIGHT, RoleCode};

use super::*;

use crate::NewRole;

impl AccessBootstrapService {
    /// Inserts declared roles whose code is not yet in the active catalog.
    pub(crate) async fn seed_roles(&self, policy: &AccessPolicy) -> AppResult<usize> {
        if policy.roles.is_empty() {
            return Ok(0);
        }

        let codes: Vec<RoleCode> = policy.roles.iter().map(|name| name.code()).collect();
        let existing = self.roles.list_active_by_codes(&codes).await?;

        // Seeding the set with existing codes makes one pass handle both
        // the diff and duplicate declarations.
        let mut seen: HashSet<RoleCode> = existing.into_iter().map(|role| role.code).collect();

        let mut missing = Vec::new();
        for name in &policy.roles {
            if seen.insert(name.code()) {
                missing.push(NewRole {
                    name: name.clone(),
                    weight: DEFAULT_ROLE_WEIGHT,
                });
            }
        }

        if missing.is_empty() {
            return Ok(0);
        }

        let inserted = missing.len();
        self.roles.insert_roles(missing).await?;

        Ok(inserted)
    }
}
