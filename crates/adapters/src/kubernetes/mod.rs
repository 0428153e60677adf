// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes cronjob backend: one `batch/v1` CronJob per application job.
//!
//! # Module layout
//!
//! - [`cronjob`]: CronJob manifest construction and parsing
//!
//! # Resource model
//!
//! Each job becomes a CronJob named `derive_name(app, job)` in the app's
//! namespace. Writes are read-before-write: an existing resource is replaced
//! (carrying its `resourceVersion`), a missing one is created. Each call is a
//! single API write, so a cancelled deploy never leaves a partial resource.

mod cronjob;

pub use cronjob::{unwrap_command, wrap_command};

use crate::backend::{BackendError, CronjobManager, CronjobProvisioner, Provisioner};
use async_trait::async_trait;
use cronjob::CronjobParams;
use cw_core::{app_selector, derive_name, AppIdentity, JobSpec, LabelOptions, LabelSet};
use k8s_openapi::api::batch::v1::CronJob;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Kubernetes backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Namespace for app resources (or prefix, with `pool_namespaces`)
    pub namespace: String,
    /// Use `<namespace>-<pool>` per pool instead of a single namespace
    pub pool_namespaces: bool,
    pub label_prefix: String,
    /// Provisioner identity recorded in resource labels
    pub provisioner: String,
    /// UID job containers run as
    pub run_as_user: Option<i64>,
    pub image_pull_secrets: Vec<String>,
    /// Memory overcommit factor per pool (default 1)
    pub overcommit: BTreeMap<String, i64>,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        let labels = LabelOptions::default();
        Self {
            namespace: "default".to_string(),
            pool_namespaces: false,
            label_prefix: labels.prefix,
            provisioner: labels.provisioner,
            run_as_user: None,
            image_pull_secrets: Vec::new(),
            overcommit: BTreeMap::new(),
        }
    }
}

impl KubernetesConfig {
    /// Namespace holding `app`'s resources.
    pub fn namespace_for(&self, app: &AppIdentity) -> String {
        if self.pool_namespaces && !app.pool.is_empty() {
            format!("{}-{}", self.namespace, cw_core::sanitize(&app.pool))
        } else {
            self.namespace.clone()
        }
    }

    pub fn overcommit_for(&self, pool: &str) -> i64 {
        self.overcommit
            .get(pool)
            .copied()
            .filter(|f| *f > 0)
            .unwrap_or(1)
    }

    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            prefix: self.label_prefix.clone(),
            provisioner: self.provisioner.clone(),
        }
    }
}

/// Map a kube error onto the backend error kinds.
pub(crate) fn backend_error(err: kube::Error) -> BackendError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => BackendError::NotFound(resp.message),
        kube::Error::Api(resp) if resp.code == 409 || resp.code == 422 => {
            BackendError::Invalid(resp.message)
        }
        other => BackendError::Api(other.to_string()),
    }
}

/// Cronjob backend backed by a Kubernetes cluster.
#[derive(Clone)]
pub struct KubernetesProvisioner {
    client: Client,
    config: KubernetesConfig,
}

impl KubernetesProvisioner {
    /// Connect using the ambient kubeconfig or in-cluster credentials.
    pub async fn new(config: KubernetesConfig) -> Result<Self, BackendError> {
        let client = Client::try_default()
            .await
            .map_err(|e| BackendError::Api(format!("failed to create kube client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: KubernetesConfig) -> Self {
        Self { client, config }
    }

    fn cronjobs(&self, app: &AppIdentity) -> Api<CronJob> {
        Api::namespaced(self.client.clone(), &self.config.namespace_for(app))
    }

    async fn apply(
        &self,
        app: &AppIdentity,
        job: &JobSpec,
        labels: &LabelSet,
        image: &str,
    ) -> Result<(), BackendError> {
        let api = self.cronjobs(app);
        let name = derive_name(&app.name, &job.name);
        let existing = api.get_opt(&name).await.map_err(backend_error)?;

        let mut cronjob = cronjob::build_cronjob(&CronjobParams {
            app,
            job,
            labels,
            image,
            namespace: self.config.namespace_for(app),
            node_selector: if app.pool.is_empty() {
                BTreeMap::new()
            } else {
                self.config.label_options().pool_node_selector(&app.pool)
            },
            overcommit: self.config.overcommit_for(&app.pool),
            run_as_user: self.config.run_as_user,
            pull_secrets: &self.config.image_pull_secrets,
        });

        let pp = PostParams::default();
        match existing {
            Some(old) => {
                cronjob.metadata.resource_version = old.metadata.resource_version;
                tracing::debug!(app = %app.name, cronjob = %name, "replacing cronjob");
                api.replace(&name, &pp, &cronjob)
                    .await
                    .map_err(backend_error)?;
            }
            None => {
                tracing::debug!(app = %app.name, cronjob = %name, "creating cronjob");
                api.create(&pp, &cronjob).await.map_err(backend_error)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CronjobManager for KubernetesProvisioner {
    async fn deploy_job(
        &self,
        cancel: &CancellationToken,
        app: &AppIdentity,
        job: &JobSpec,
        labels: &LabelSet,
        image: &str,
    ) -> Result<(), BackendError> {
        if cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!(app = %app.name, job = %job.name, "cronjob deploy cancelled");
                Err(BackendError::Cancelled)
            }
            result = self.apply(app, job, labels, image) => result,
        }
    }

    async fn remove_job(&self, app: &AppIdentity, job_name: &str) -> Result<(), BackendError> {
        let name = derive_name(&app.name, job_name);
        let api = self.cronjobs(app);
        match api.delete(&name, &DeleteParams::foreground()).await {
            Ok(_) => {
                tracing::debug!(app = %app.name, cronjob = %name, "deleted cronjob");
                Ok(())
            }
            Err(e) => match backend_error(e) {
                BackendError::NotFound(_) => Ok(()),
                other => Err(other),
            },
        }
    }

    async fn current_labels(
        &self,
        app: &AppIdentity,
        job_name: &str,
    ) -> Result<LabelSet, BackendError> {
        let name = derive_name(&app.name, job_name);
        let api = self.cronjobs(app);
        let existing = api.get_opt(&name).await.map_err(backend_error)?;
        Ok(match existing {
            Some(cj) => cronjob::labels_of(&cj),
            None => LabelSet::default(),
        })
    }
}

#[async_trait]
impl CronjobProvisioner for KubernetesProvisioner {
    async fn list_jobs(&self, app: &AppIdentity) -> Result<Vec<JobSpec>, BackendError> {
        let opts = self.config.label_options();
        let selector = app_selector(app, &opts).selector();
        let list = self
            .cronjobs(app)
            .list(&ListParams::default().labels(&selector))
            .await
            .map_err(backend_error)?;
        let mut jobs: Vec<JobSpec> = list
            .items
            .iter()
            .filter_map(|cj| cronjob::job_spec_from_cronjob(cj, &opts))
            .collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(jobs)
    }

    async fn get_job(
        &self,
        app: &AppIdentity,
        job_name: &str,
    ) -> Result<Option<JobSpec>, BackendError> {
        let name = derive_name(&app.name, job_name);
        let api = self.cronjobs(app);
        let existing = api.get_opt(&name).await.map_err(backend_error)?;
        Ok(match existing {
            Some(cj) => cronjob::job_spec_from_cronjob(&cj, &self.config.label_options()),
            None => None,
        })
    }
}

impl Provisioner for KubernetesProvisioner {
    fn name(&self) -> &str {
        &self.config.provisioner
    }

    fn label_options(&self) -> LabelOptions {
        self.config.label_options()
    }

    fn cronjob_manager(&self) -> Option<&dyn CronjobManager> {
        Some(self)
    }

    fn cronjob_provisioner(&self) -> Option<&dyn CronjobProvisioner> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
