// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution backend contract for scheduled jobs.
//!
//! The reconciler only ever talks to a backend through [`CronjobManager`].
//! The operator command surface additionally needs [`CronjobProvisioner`] to
//! read jobs back. A configured [`Provisioner`] advertises which of the two
//! it supports; a provisioner that supports neither cannot run cronjobs.

use async_trait::async_trait;
use cw_core::{AppIdentity, JobSpec, LabelOptions, LabelSet};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from a single backend call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("backend call cancelled")]
    Cancelled,
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("resource rejected by backend: {0}")]
    Invalid(String),
    #[error("backend api call failed: {0}")]
    Api(String),
}

/// Capabilities the reconciliation pipeline needs from a backend.
#[async_trait]
pub trait CronjobManager: Send + Sync {
    /// Create or update the resource named `derive_name(app, job.name)`.
    ///
    /// Idempotent for identical inputs. Returns [`BackendError::Cancelled`]
    /// promptly once `cancel` fires; a cancelled call never leaves a
    /// half-written resource behind.
    async fn deploy_job(
        &self,
        cancel: &CancellationToken,
        app: &AppIdentity,
        job: &JobSpec,
        labels: &LabelSet,
        image: &str,
    ) -> Result<(), BackendError>;

    /// Delete the resource for `job_name`. Succeeds if it does not exist.
    async fn remove_job(&self, app: &AppIdentity, job_name: &str) -> Result<(), BackendError>;

    /// Best-effort read of the live resource's labels; may be empty.
    async fn current_labels(
        &self,
        app: &AppIdentity,
        job_name: &str,
    ) -> Result<LabelSet, BackendError>;
}

/// Read access used by the list/update commands.
#[async_trait]
pub trait CronjobProvisioner: Send + Sync {
    /// Jobs currently deployed for `app`, sorted by name.
    async fn list_jobs(&self, app: &AppIdentity) -> Result<Vec<JobSpec>, BackendError>;

    /// The deployed job named `job_name`, if any.
    async fn get_job(
        &self,
        app: &AppIdentity,
        job_name: &str,
    ) -> Result<Option<JobSpec>, BackendError>;
}

/// A configured execution backend.
pub trait Provisioner: Send + Sync {
    fn name(&self) -> &str;

    /// Label keys and provisioner identity this backend stamps on resources.
    fn label_options(&self) -> LabelOptions {
        LabelOptions::default()
    }

    /// Default: None (cronjobs unsupported)
    fn cronjob_manager(&self) -> Option<&dyn CronjobManager> {
        None
    }

    /// Default: None (cronjobs unsupported)
    fn cronjob_provisioner(&self) -> Option<&dyn CronjobProvisioner> {
        None
    }
}
