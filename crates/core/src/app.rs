// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application identity as seen by the cronjob reconciler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An application whose scheduled jobs are reconciled.
///
/// `current_image` is the image now being rolled out (or already active);
/// `previous_image` is the one it replaces, whose declared jobs make up the
/// current state. An application deployed for the first time has no
/// previous image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub name: String,
    /// Target pool (node group) the jobs are scheduled on
    #[serde(default)]
    pub pool: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub team_owner: String,
    /// Memory limit in bytes; 0 means unlimited
    #[serde(default)]
    pub memory: i64,
    /// CPU limit in millicores; 0 means unlimited
    #[serde(default)]
    pub cpu_milli: i64,
    /// Environment variables injected into every job container
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_image: Option<String>,
}

crate::builder! {
    pub struct AppIdentityBuilder => AppIdentity {
        into {
            name: String = "myapp",
            pool: String = "default-pool",
            platform: String = "python",
            team_owner: String = "admin",
        }
        set {
            memory: i64 = 0,
            cpu_milli: i64 = 0,
            env: BTreeMap<String, String> = BTreeMap::new(),
            current_image: Option<String> = Some("registry/myapp:v2".to_string()),
            previous_image: Option<String> = Some("registry/myapp:v1".to_string()),
        }
    }
}
