// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled job definitions.
//!
//! A [`JobSpec`] is plain value data. It is never edited in place: updates
//! produce a new spec (see [`JobSpecPatch::apply`]) that replaces the old one
//! wholesale under the same name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Job name → spec for one application.
///
/// Iteration order carries no meaning; the reconciliation pipeline imposes its
/// own deterministic ordering.
pub type StateMap = HashMap<String, JobSpec>;

/// Errors from parsing core value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid concurrency policy {0:?} (expected Allow, Forbid or Replace)")]
    ConcurrencyPolicy(String),
    #[error("invalid permission context {0:?}")]
    PermissionContext(String),
}

/// Whether overlapping scheduled runs may coexist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcurrencyPolicy {
    /// Runs may overlap
    #[default]
    Allow,
    /// Skip a run while the previous one is still active
    Forbid,
    /// Cancel the active run and start the new one
    Replace,
}

crate::simple_display! {
    ConcurrencyPolicy {
        Allow => "Allow",
        Forbid => "Forbid",
        Replace => "Replace",
    }
}

impl FromStr for ConcurrencyPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "forbid" => Ok(Self::Forbid),
            "replace" => Ok(Self::Replace),
            _ => Err(ParseError::ConcurrencyPolicy(s.to_string())),
        }
    }
}

/// One scheduled workload of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Unique within the application
    pub name: String,
    /// Cron expression, interpreted by the backend
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub concurrency_policy: ConcurrencyPolicy,
    /// Shell command executed for each run
    #[serde(default)]
    pub command: String,
    /// When set the backend must not trigger new runs
    #[serde(default)]
    pub suspend: bool,
    /// Retained successful runs; 0 means backend default
    #[serde(
        default,
        rename = "successfulJobsHistoryLimit",
        alias = "successfulRunsHistoryLimit"
    )]
    pub successful_runs_history_limit: u32,
    /// Retained failed runs; 0 means backend default
    #[serde(
        default,
        rename = "failedJobsHistoryLimit",
        alias = "failedRunsHistoryLimit"
    )]
    pub failed_runs_history_limit: u32,
}

impl JobSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

crate::builder! {
    pub struct JobSpecBuilder => JobSpec {
        into {
            name: String = "web",
            schedule: String = "*/5 * * * *",
            command: String = "echo hello",
        }
        set {
            concurrency_policy: ConcurrencyPolicy = ConcurrencyPolicy::Allow,
            suspend: bool = false,
            successful_runs_history_limit: u32 = 0,
            failed_runs_history_limit: u32 = 0,
        }
    }
}

/// Partial update of a stored job.
///
/// `None` leaves the stored value untouched. Empty strings are treated as
/// absent since neither a schedule nor a command may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpecPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency_policy: Option<ConcurrencyPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_runs_history_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_runs_history_limit: Option<u32>,
}

impl JobSpecPatch {
    /// Returns `base` with every present field of the patch applied.
    pub fn apply(&self, base: &JobSpec) -> JobSpec {
        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.is_empty()).cloned();
        JobSpec {
            name: base.name.clone(),
            schedule: non_empty(&self.schedule)
                .unwrap_or_else(|| base.schedule.clone()),
            concurrency_policy: self.concurrency_policy.unwrap_or(base.concurrency_policy),
            command: non_empty(&self.command)
                .unwrap_or_else(|| base.command.clone()),
            suspend: self.suspend.unwrap_or(base.suspend),
            successful_runs_history_limit: self
                .successful_runs_history_limit
                .unwrap_or(base.successful_runs_history_limit),
            failed_runs_history_limit: self
                .failed_runs_history_limit
                .unwrap_or(base.failed_runs_history_limit),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
