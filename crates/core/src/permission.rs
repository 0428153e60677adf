// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission schemes guarding the cronjob command surface.
//!
//! Schemes are dotted paths (`app.update.cronjob.add`); holding a scheme
//! grants every scheme below it. The set of known schemes is an explicit
//! [`PermissionRegistry`] built at startup and handed to whoever validates
//! grants.

use crate::app::AppIdentity;
use crate::job::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Capabilities required by the cronjob commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Add or update a job
    CronjobAdd,
    CronjobDelete,
    CronjobList,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::CronjobAdd,
        Permission::CronjobDelete,
        Permission::CronjobList,
    ];

    pub fn scheme(&self) -> &'static str {
        match self {
            Permission::CronjobAdd => "app.update.cronjob.add",
            Permission::CronjobDelete => "app.update.cronjob.delete",
            Permission::CronjobList => "app.update.cronjob.list",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Whether holding `granted` allows `required`.
pub fn scheme_covers(granted: &str, required: &str) -> bool {
    match required.strip_prefix(granted) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Where a grant applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionContext {
    Global,
    App(String),
    Team(String),
    Pool(String),
}

impl PermissionContext {
    /// Contexts an application belongs to.
    pub fn for_app(app: &AppIdentity) -> Vec<PermissionContext> {
        vec![
            PermissionContext::Global,
            PermissionContext::App(app.name.clone()),
            PermissionContext::Team(app.team_owner.clone()),
            PermissionContext::Pool(app.pool.clone()),
        ]
    }
}

impl fmt::Display for PermissionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionContext::Global => f.write_str("global"),
            PermissionContext::App(v) => write!(f, "app:{}", v),
            PermissionContext::Team(v) => write!(f, "team:{}", v),
            PermissionContext::Pool(v) => write!(f, "pool:{}", v),
        }
    }
}

impl FromStr for PermissionContext {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            return Ok(PermissionContext::Global);
        }
        let invalid = || ParseError::PermissionContext(s.to_string());
        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        if value.is_empty() {
            return Err(invalid());
        }
        match kind {
            "app" => Ok(PermissionContext::App(value.to_string())),
            "team" => Ok(PermissionContext::Team(value.to_string())),
            "pool" => Ok(PermissionContext::Pool(value.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for PermissionContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PermissionContext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors from permission registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown permission scheme: {0}")]
    UnknownScheme(String),
}

/// Known permission schemes, including every parent path.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    schemes: BTreeSet<String>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the cronjob schemes and their parents.
    pub fn with_cronjob_schemes() -> Self {
        let mut registry = Self::new();
        for permission in Permission::ALL {
            registry.register(permission.scheme());
        }
        registry
    }

    /// Register `scheme` and each of its parents.
    pub fn register(&mut self, scheme: &str) {
        let mut path = String::new();
        for part in scheme.split('.') {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(part);
            self.schemes.insert(path.clone());
        }
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains(scheme)
    }

    /// Validate `scheme`, returning it unchanged when known.
    pub fn get<'a>(&self, scheme: &'a str) -> Result<&'a str, RegistryError> {
        if self.contains(scheme) {
            Ok(scheme)
        } else {
            Err(RegistryError::UnknownScheme(scheme.to_string()))
        }
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "permission_tests.rs"]
mod tests;
