// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod cronjob;
pub mod deploy;

use crate::config::Config;
use crate::exit_error::{ExitError, EXIT_FAILURE};
use crate::output::OutputFormat;
use cw_adapters::KubernetesProvisioner;
use cw_core::{AppIdentity, PermissionRegistry};
use cw_engine::GrantTable;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: Config,
    /// `--app`; optional when a single app is configured
    pub app: Option<String>,
    pub subject: String,
    pub format: OutputFormat,
}

impl Context {
    pub fn app(&self) -> Result<&AppIdentity, ExitError> {
        Ok(self.config.app(self.app.as_deref())?)
    }

    pub fn grants(&self) -> Result<GrantTable, ExitError> {
        let registry = PermissionRegistry::with_cronjob_schemes();
        Ok(self.config.grant_table(&registry)?)
    }

    pub async fn provisioner(&self) -> Result<KubernetesProvisioner, ExitError> {
        KubernetesProvisioner::new(self.config.kubernetes.clone())
            .await
            .map_err(|e| ExitError::new(EXIT_FAILURE, e.to_string()))
    }
}
