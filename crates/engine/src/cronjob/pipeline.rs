// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two cronjob reconciliation actions and their shared context.

use crate::error::CronjobError;
use crate::saga::Action;
use async_trait::async_trait;
use cw_adapters::CronjobManager;
use cw_core::{derive_labels, difference, sorted_keys, AppIdentity, LabelOptions, StateMap};
use tokio_util::sync::CancellationToken;

/// State owned by one reconciliation run.
pub struct PipelineContext<'a> {
    pub manager: &'a dyn CronjobManager,
    pub app: &'a AppIdentity,
    pub new_image: String,
    pub desired: StateMap,
    /// Image the current jobs were deployed with; used to restore them
    pub previous_image: Option<String>,
    pub current: StateMap,
    /// Root token; each deploy gets a child of it
    pub cancel: Option<CancellationToken>,
    pub labels: LabelOptions,
    /// Jobs deployed by the update step, in deployment order
    pub deployed: Vec<String>,
    pub removed: Vec<String>,
    /// Stale jobs whose removal failed
    pub stale_failures: Vec<String>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(manager: &'a dyn CronjobManager, app: &'a AppIdentity, new_image: &str) -> Self {
        Self {
            manager,
            app,
            new_image: new_image.to_string(),
            desired: StateMap::new(),
            previous_image: None,
            current: StateMap::new(),
            cancel: None,
            labels: LabelOptions::default(),
            deployed: Vec::new(),
            removed: Vec::new(),
            stale_failures: Vec::new(),
        }
    }
}

/// Restore every deployed job to its current version, or remove it if new.
async fn rollback_deployed(ctx: &PipelineContext<'_>) {
    for name in &ctx.deployed {
        let restore = ctx.current.get(name).zip(ctx.previous_image.as_deref());
        let result = match restore {
            Some((job, image)) => {
                let labels = derive_labels(ctx.app, name, &ctx.labels);
                // Fresh token: a cancelled run must still be able to restore
                let token = CancellationToken::new();
                ctx.manager
                    .deploy_job(&token, ctx.app, job, &labels, image)
                    .await
            }
            None => ctx.manager.remove_job(ctx.app, name).await,
        };
        match result {
            Ok(()) => tracing::info!(app = %ctx.app.name, job = %name, "rolled back cronjob"),
            Err(e) => tracing::error!(
                app = %ctx.app.name,
                job = %name,
                error = %e,
                "error rolling back cronjob"
            ),
        }
    }
}

/// Deploy every desired job in name order.
pub struct UpdateCronjobs;

#[async_trait]
impl<'a> Action<PipelineContext<'a>, CronjobError> for UpdateCronjobs {
    fn name(&self) -> &str {
        "update-cronjobs"
    }

    async fn forward(&self, ctx: &mut PipelineContext<'a>) -> Result<(), CronjobError> {
        let root = ctx.cancel.clone().unwrap_or_default();
        ctx.deployed.clear();

        for name in sorted_keys(&ctx.desired) {
            let Some(job) = ctx.desired.get(&name) else {
                continue;
            };
            let labels = derive_labels(ctx.app, &name, &ctx.labels);
            let token = root.child_token();
            let result = ctx
                .manager
                .deploy_job(&token, ctx.app, job, &labels, &ctx.new_image)
                .await;
            match result {
                Ok(()) => {
                    tracing::info!(
                        app = %ctx.app.name,
                        job = %name,
                        image = %ctx.new_image,
                        "deployed cronjob"
                    );
                    ctx.deployed.push(name);
                }
                Err(e) => {
                    tracing::error!(
                        app = %ctx.app.name,
                        job = %name,
                        error = %e,
                        "cronjob deploy failed"
                    );
                    rollback_deployed(ctx).await;
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    async fn backward(&self, ctx: &mut PipelineContext<'a>) {
        rollback_deployed(ctx).await;
    }
}

/// Remove jobs that are current but no longer desired. Never fails.
pub struct RemoveStaleCronjobs;

#[async_trait]
impl<'a> Action<PipelineContext<'a>, CronjobError> for RemoveStaleCronjobs {
    fn name(&self) -> &str {
        "remove-old-cronjobs"
    }

    async fn forward(&self, ctx: &mut PipelineContext<'a>) -> Result<(), CronjobError> {
        for name in difference(&ctx.current, &ctx.desired) {
            match ctx.manager.remove_job(ctx.app, &name).await {
                Ok(()) => {
                    tracing::info!(app = %ctx.app.name, job = %name, "removed stale cronjob");
                    ctx.removed.push(name);
                }
                Err(e) => {
                    tracing::warn!(
                        app = %ctx.app.name,
                        job = %name,
                        error = %e,
                        "ignored error removing stale cronjob"
                    );
                    ctx.stale_failures.push(name);
                }
            }
        }
        Ok(())
    }
}
