// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership labels for backend resources.
//!
//! Every cronjob resource carries a [`LabelSet`] identifying the application
//! and job that own it. The same keys build the selector used to list an
//! application's resources, so a selector for app A matches exactly the
//! resources written for A.

use crate::app::AppIdentity;
use crate::naming::sanitize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const IS_MANAGED: &str = "is-managed";
pub const IS_SERVICE: &str = "is-service";
pub const IS_BUILD: &str = "is-build";
pub const IS_STOPPED: &str = "is-stopped";
pub const IS_DEPLOY: &str = "is-deploy";
pub const IS_ISOLATED_RUN: &str = "is-isolated-run";
pub const APP_NAME: &str = "app-name";
pub const APP_PROCESS: &str = "app-process";
pub const APP_PLATFORM: &str = "app-platform";
pub const APP_POOL: &str = "app-pool";
pub const APP_TEAM: &str = "app-team";
pub const PROVISIONER: &str = "provisioner";
/// Annotation holding the unsanitized job name
pub const JOB_NAME: &str = "job-name";
/// Node label used to pin jobs to their pool
pub const POOL: &str = "pool";

/// Key prefix and provisioner identity stamped on every resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOptions {
    pub prefix: String,
    pub provisioner: String,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            prefix: "cronwarden.io/".to_string(),
            provisioner: "kubernetes".to_string(),
        }
    }
}

impl LabelOptions {
    /// Fully qualified key for `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Original job name recorded on a resource, falling back to the
    /// sanitized process label.
    pub fn job_name<'a>(&self, set: &'a LabelSet) -> Option<&'a str> {
        set.annotations
            .get(&self.key(JOB_NAME))
            .or_else(|| set.labels.get(&self.key(APP_PROCESS)))
            .map(String::as_str)
    }

    /// Node selector pinning pods to the application's pool.
    pub fn pool_node_selector(&self, pool: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(self.key(POOL), pool.to_string())])
    }
}

/// Labels and annotations attached to one backend resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl LabelSet {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.annotations.is_empty()
    }

    /// Label selector string (`k=v,k=v`) over this set's labels.
    pub fn selector(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether `labels` carries every label of this set with the same value.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.labels.iter().all(|(k, v)| labels.get(k) == Some(v))
    }
}

/// Labels for job `job_name` of `app`.
///
/// Deterministic for the same app metadata; changes to pool, platform or
/// owner yield a different set.
pub fn derive_labels(app: &AppIdentity, job_name: &str, opts: &LabelOptions) -> LabelSet {
    let mut set = app_selector(app, opts);
    let flags = [
        (IS_SERVICE, "true"),
        (IS_BUILD, "false"),
        (IS_STOPPED, "false"),
        (IS_DEPLOY, "false"),
        (IS_ISOLATED_RUN, "false"),
    ];
    for (name, value) in flags {
        set.labels.insert(opts.key(name), value.to_string());
    }
    set.labels.insert(opts.key(APP_PROCESS), sanitize(job_name));
    set.labels.insert(opts.key(APP_PLATFORM), app.platform.clone());
    set.labels.insert(opts.key(APP_POOL), app.pool.clone());
    set.labels.insert(opts.key(APP_TEAM), app.team_owner.clone());
    set.annotations.insert(opts.key(JOB_NAME), job_name.to_string());
    set
}

/// Selector matching every cronjob resource owned by `app`.
pub fn app_selector(app: &AppIdentity, opts: &LabelOptions) -> LabelSet {
    let labels = BTreeMap::from([
        (opts.key(IS_MANAGED), "true".to_string()),
        (opts.key(APP_NAME), app.name.clone()),
        (opts.key(PROVISIONER), opts.provisioner.clone()),
    ]);
    LabelSet {
        labels,
        annotations: BTreeMap::new(),
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
