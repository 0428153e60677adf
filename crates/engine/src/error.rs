// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by reconciliation runs and cronjob commands

use cw_adapters::{BackendError, ManifestError};
use cw_core::Permission;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronjobError {
    /// A manifest could not be loaded; nothing was sent to the backend
    #[error("failed to resolve cronjobs: {0}")]
    Resolution(#[from] ManifestError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The configured provisioner cannot run cronjobs
    #[error("provisioner {0} does not implement the cronjob interface")]
    CapabilityMismatch(String),
    #[error("{subject} does not have permission {permission} on app {app}")]
    Forbidden {
        subject: String,
        permission: Permission,
        app: String,
    },
    #[error("cronjob {job} not found for app {app}")]
    JobNotFound { app: String, job: String },
    #[error("app {0} has no deployed image")]
    NoImage(String),
    #[error("invalid cronjob: {0}")]
    InvalidJob(String),
}
