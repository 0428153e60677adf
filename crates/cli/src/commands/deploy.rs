// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cw deploy` and `cw plan`

use super::Context;
use crate::config::load_overrides;
use crate::exit_error::{ExitError, EXIT_CONFIG};
use crate::output::{format_plan, format_report, print_json, OutputFormat};
use anyhow::Result;
use clap::Args;
use cw_core::{AppIdentity, StateMap};
use cw_engine::CronjobService;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Image to reconcile to (default: the app's current image)
    pub image: Option<String>,
    /// TOML file of cronjobs replacing or adding to the image's jobs
    #[arg(long = "override", value_name = "FILE")]
    pub overrides: Option<PathBuf>,
}

impl DeployArgs {
    fn image(&self, app: &AppIdentity) -> Result<String, ExitError> {
        self.image
            .clone()
            .or_else(|| app.current_image.clone())
            .ok_or_else(|| {
                let message = format!("no image given and app {} has none", app.name);
                ExitError::new(EXIT_CONFIG, message)
            })
    }

    fn overrides(&self) -> Result<StateMap, ExitError> {
        match &self.overrides {
            Some(path) => Ok(load_overrides(path)?),
            None => Ok(StateMap::new()),
        }
    }
}

pub async fn deploy(ctx: &Context, args: DeployArgs) -> Result<()> {
    let app = ctx.app()?;
    let image = args.image(app)?;
    let overrides = args.overrides()?;
    let grants = ctx.grants()?;
    let store = ctx.config.manifest_store();
    let provisioner = ctx.provisioner().await?;
    let service = CronjobService::new(&provisioner, &store, &grants);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling cronjob deploy");
            on_interrupt.cancel();
        }
    });

    let report = service
        .deploy(&ctx.subject, app, &image, &overrides, Some(cancel))
        .await
        .map_err(ExitError::from)?;
    match ctx.format {
        OutputFormat::Text => print!("{}", format_report(&app.name, &report)),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

pub async fn plan(ctx: &Context, args: DeployArgs) -> Result<()> {
    let app = ctx.app()?;
    let image = args.image(app)?;
    let overrides = args.overrides()?;
    let store = ctx.config.manifest_store();

    let plan = cw_engine::cronjob::plan(&store, app, &image, &overrides)
        .await
        .map_err(ExitError::from)?;
    match ctx.format {
        OutputFormat::Text => print!("{}", format_plan(&plan)),
        OutputFormat::Json => print_json(&plan)?,
    }
    Ok(())
}
