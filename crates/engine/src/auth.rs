// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission checks for the cronjob commands.

use cw_core::{scheme_covers, Permission, PermissionContext, PermissionRegistry, RegistryError};
use serde::{Deserialize, Serialize};

/// Decides whether a subject holds a permission in any of the given contexts.
pub trait Authorizer: Send + Sync {
    fn check(&self, subject: &str, permission: Permission, contexts: &[PermissionContext]) -> bool;
}

/// One permission granted to one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub subject: String,
    /// Permission scheme; parents cover their children
    pub permission: String,
    #[serde(default = "global_context")]
    pub context: PermissionContext,
}

fn global_context() -> PermissionContext {
    PermissionContext::Global
}

/// Static grants validated against a [`PermissionRegistry`].
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    grants: Vec<Grant>,
}

impl GrantTable {
    /// Build from `grants`, rejecting schemes the registry does not know.
    pub fn new(registry: &PermissionRegistry, grants: Vec<Grant>) -> Result<Self, RegistryError> {
        for grant in &grants {
            registry.get(&grant.permission)?;
        }
        Ok(Self { grants })
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl Authorizer for GrantTable {
    fn check(&self, subject: &str, permission: Permission, contexts: &[PermissionContext]) -> bool {
        self.grants.iter().any(|g| {
            g.subject == subject
                && scheme_covers(&g.permission, permission.scheme())
                && contexts.contains(&g.context)
        })
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
