// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cw add`, `cw list`, `cw update` and `cw delete`

use super::Context;
use crate::exit_error::ExitError;
use crate::output::{format_jobs, print_json, OutputFormat};
use anyhow::Result;
use clap::Args;
use cw_core::{ConcurrencyPolicy, JobSpec, JobSpecPatch};
use cw_engine::CronjobService;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Job name, unique within the app
    pub name: String,
    /// Cron expression
    #[arg(long)]
    pub schedule: String,
    /// Shell command run on each trigger
    #[arg(long)]
    pub command: String,
    #[arg(long, default_value_t = ConcurrencyPolicy::Allow)]
    pub concurrency_policy: ConcurrencyPolicy,
    /// Create the job suspended
    #[arg(long)]
    pub suspend: bool,
    /// Successful runs to keep (0 = backend default)
    #[arg(long, default_value_t = 0)]
    pub successful_history: u32,
    /// Failed runs to keep (0 = backend default)
    #[arg(long, default_value_t = 0)]
    pub failed_history: u32,
}

impl AddArgs {
    pub fn into_job(self) -> JobSpec {
        JobSpec {
            name: self.name,
            schedule: self.schedule,
            concurrency_policy: self.concurrency_policy,
            command: self.command,
            suspend: self.suspend,
            successful_runs_history_limit: self.successful_history,
            failed_runs_history_limit: self.failed_history,
        }
    }
}

/// Fields left out keep their deployed values.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub name: String,
    #[arg(long)]
    pub schedule: Option<String>,
    #[arg(long)]
    pub command: Option<String>,
    #[arg(long)]
    pub concurrency_policy: Option<ConcurrencyPolicy>,
    #[arg(long, value_name = "BOOL")]
    pub suspend: Option<bool>,
    #[arg(long)]
    pub successful_history: Option<u32>,
    #[arg(long)]
    pub failed_history: Option<u32>,
}

impl UpdateArgs {
    pub fn patch(&self) -> JobSpecPatch {
        JobSpecPatch {
            schedule: self.schedule.clone(),
            concurrency_policy: self.concurrency_policy,
            command: self.command.clone(),
            suspend: self.suspend,
            successful_runs_history_limit: self.successful_history,
            failed_runs_history_limit: self.failed_history,
        }
    }
}

pub async fn add(ctx: &Context, args: AddArgs) -> Result<()> {
    let app = ctx.app()?;
    let grants = ctx.grants()?;
    let store = ctx.config.manifest_store();
    let provisioner = ctx.provisioner().await?;
    let service = CronjobService::new(&provisioner, &store, &grants);

    let name = service
        .add(&ctx.subject, app, args.into_job())
        .await
        .map_err(ExitError::from)?;
    match ctx.format {
        OutputFormat::Text => println!("Cronjob '{}' deployed for app {}", name, app.name),
        OutputFormat::Json => print_json(&serde_json::json!({ "cronjob": name }))?,
    }
    Ok(())
}

pub async fn list(ctx: &Context) -> Result<()> {
    let app = ctx.app()?;
    let grants = ctx.grants()?;
    let store = ctx.config.manifest_store();
    let provisioner = ctx.provisioner().await?;
    let service = CronjobService::new(&provisioner, &store, &grants);

    let jobs = service
        .list(&ctx.subject, app)
        .await
        .map_err(ExitError::from)?;
    match ctx.format {
        OutputFormat::Text => print!("{}", format_jobs(&jobs)),
        OutputFormat::Json => print_json(&jobs)?,
    }
    Ok(())
}

pub async fn update(ctx: &Context, args: UpdateArgs) -> Result<()> {
    let app = ctx.app()?;
    let grants = ctx.grants()?;
    let store = ctx.config.manifest_store();
    let provisioner = ctx.provisioner().await?;
    let service = CronjobService::new(&provisioner, &store, &grants);

    let patch = args.patch();
    if patch.is_empty() {
        tracing::warn!(job = %args.name, "no fields given, redeploying unchanged");
    }
    let job = service
        .update(&ctx.subject, app, &args.name, &patch)
        .await
        .map_err(ExitError::from)?;
    match ctx.format {
        OutputFormat::Text => println!("Cronjob '{}' updated for app {}", job.name, app.name),
        OutputFormat::Json => print_json(&job)?,
    }
    Ok(())
}

pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    let app = ctx.app()?;
    let grants = ctx.grants()?;
    let store = ctx.config.manifest_store();
    let provisioner = ctx.provisioner().await?;
    let service = CronjobService::new(&provisioner, &store, &grants);

    service
        .delete(&ctx.subject, app, name)
        .await
        .map_err(ExitError::from)?;
    match ctx.format {
        OutputFormat::Text => println!("Cronjob '{}' deleted from app {}", name, app.name),
        OutputFormat::Json => print_json(&serde_json::json!({ "deleted": name }))?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "cronjob_tests.rs"]
mod tests;
