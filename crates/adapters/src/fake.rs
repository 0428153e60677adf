// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory cronjob backend for tests.

use crate::backend::{BackendError, CronjobManager, CronjobProvisioner, Provisioner};
use async_trait::async_trait;
use cw_core::{derive_name, AppIdentity, JobSpec, LabelOptions, LabelSet};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronjobCall {
    Deploy {
        app: String,
        job: JobSpec,
        labels: LabelSet,
        image: String,
    },
    Remove { app: String, job: String },
}

impl CronjobCall {
    /// `"deploy:<job>"` or `"remove:<job>"`, handy for ordering assertions.
    pub fn summary(&self) -> String {
        match self {
            CronjobCall::Deploy { job, .. } => format!("deploy:{}", job.name),
            CronjobCall::Remove { job, .. } => format!("remove:{}", job),
        }
    }
}

/// A job as stored by the fake backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCronjob {
    pub app: String,
    pub job: JobSpec,
    pub labels: LabelSet,
    pub image: String,
}

#[derive(Default)]
struct FakeBackendState {
    calls: Vec<CronjobCall>,
    /// Keyed by backend resource name
    jobs: BTreeMap<String, FakeCronjob>,
    deploy_errors: HashMap<String, BackendError>,
    remove_errors: HashMap<String, BackendError>,
    /// Deploys of these jobs block until cancelled
    hang_on_deploy: HashSet<String>,
}

/// Fake backend that records calls and keeps deployed jobs in memory.
#[derive(Clone, Default)]
pub struct FakeCronjobBackend {
    inner: Arc<Mutex<FakeBackendState>>,
    labels: LabelOptions,
}

impl FakeCronjobBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every deploy of `job` with `err`.
    pub fn fail_deploy(&self, job: &str, err: BackendError) {
        self.inner.lock().deploy_errors.insert(job.to_string(), err);
    }

    /// Fail every removal of `job` with `err`.
    pub fn fail_remove(&self, job: &str, err: BackendError) {
        self.inner.lock().remove_errors.insert(job.to_string(), err);
    }

    /// Make deploys of `job` wait for cancellation.
    pub fn hang_on_deploy(&self, job: &str) {
        self.inner.lock().hang_on_deploy.insert(job.to_string());
    }

    /// Store a job directly, without recording a call.
    pub fn seed(&self, app: &AppIdentity, job: JobSpec, image: &str) {
        let labels = cw_core::derive_labels(app, &job.name, &self.labels);
        let key = derive_name(&app.name, &job.name);
        let stored = FakeCronjob {
            app: app.name.clone(),
            job,
            labels,
            image: image.to_string(),
        };
        self.inner.lock().jobs.insert(key, stored);
    }

    pub fn calls(&self) -> Vec<CronjobCall> {
        self.inner.lock().calls.clone()
    }

    /// Call summaries in order (see [`CronjobCall::summary`]).
    pub fn call_summaries(&self) -> Vec<String> {
        let state = self.inner.lock();
        state.calls.iter().map(CronjobCall::summary).collect()
    }

    /// Forget recorded calls; stored jobs stay.
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Stored job by backend resource name.
    pub fn job(&self, backend_name: &str) -> Option<FakeCronjob> {
        self.inner.lock().jobs.get(backend_name).cloned()
    }

    /// Backend resource names currently stored.
    pub fn job_names(&self) -> Vec<String> {
        self.inner.lock().jobs.keys().cloned().collect()
    }
}

#[async_trait]
impl CronjobManager for FakeCronjobBackend {
    async fn deploy_job(
        &self,
        cancel: &CancellationToken,
        app: &AppIdentity,
        job: &JobSpec,
        labels: &LabelSet,
        image: &str,
    ) -> Result<(), BackendError> {
        let hang = {
            let mut state = self.inner.lock();
            state.calls.push(CronjobCall::Deploy {
                app: app.name.clone(),
                job: job.clone(),
                labels: labels.clone(),
                image: image.to_string(),
            });
            state.hang_on_deploy.contains(&job.name)
        };
        if hang {
            cancel.cancelled().await;
        }
        if cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }

        let mut state = self.inner.lock();
        if let Some(err) = state.deploy_errors.get(&job.name) {
            return Err(err.clone());
        }
        state.jobs.insert(
            derive_name(&app.name, &job.name),
            FakeCronjob {
                app: app.name.clone(),
                job: job.clone(),
                labels: labels.clone(),
                image: image.to_string(),
            },
        );
        Ok(())
    }

    async fn remove_job(&self, app: &AppIdentity, job_name: &str) -> Result<(), BackendError> {
        let mut state = self.inner.lock();
        state.calls.push(CronjobCall::Remove {
            app: app.name.clone(),
            job: job_name.to_string(),
        });
        if let Some(err) = state.remove_errors.get(job_name) {
            return Err(err.clone());
        }
        state.jobs.remove(&derive_name(&app.name, job_name));
        Ok(())
    }

    async fn current_labels(
        &self,
        app: &AppIdentity,
        job_name: &str,
    ) -> Result<LabelSet, BackendError> {
        let state = self.inner.lock();
        Ok(state
            .jobs
            .get(&derive_name(&app.name, job_name))
            .map(|j| j.labels.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CronjobProvisioner for FakeCronjobBackend {
    async fn list_jobs(&self, app: &AppIdentity) -> Result<Vec<JobSpec>, BackendError> {
        let selector = cw_core::app_selector(app, &self.labels);
        let state = self.inner.lock();
        let mut jobs: Vec<JobSpec> = state
            .jobs
            .values()
            .filter(|j| selector.matches(&j.labels.labels))
            .map(|j| j.job.clone())
            .collect();
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(jobs)
    }

    async fn get_job(
        &self,
        app: &AppIdentity,
        job_name: &str,
    ) -> Result<Option<JobSpec>, BackendError> {
        let key = derive_name(&app.name, job_name);
        let state = self.inner.lock();
        Ok(state.jobs.get(&key).map(|j| j.job.clone()))
    }
}

impl Provisioner for FakeCronjobBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn label_options(&self) -> LabelOptions {
        self.labels.clone()
    }

    fn cronjob_manager(&self) -> Option<&dyn CronjobManager> {
        Some(self)
    }

    fn cronjob_provisioner(&self) -> Option<&dyn CronjobProvisioner> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
