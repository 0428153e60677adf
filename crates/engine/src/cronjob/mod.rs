// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cronjob reconciliation.
//!
//! A run resolves current and desired state, then executes a two-action
//! [`Pipeline`]:
//!
//! 1. `update-cronjobs` deploys every desired job in name order. If a deploy
//!    fails it stops, restores the jobs it already deployed (redeploying the
//!    current version, or removing jobs that had none) and returns the
//!    original error.
//! 2. `remove-old-cronjobs` removes current jobs absent from the desired
//!    state. Removal errors are logged and the run still succeeds.
//!
//! Runs for the same app must be serialized by the caller.

mod pipeline;
mod plan;

pub use pipeline::{PipelineContext, RemoveStaleCronjobs, UpdateCronjobs};
pub use plan::{plan, JobChange, Plan, PlannedJob};

use crate::error::CronjobError;
use crate::resolve::resolve;
use crate::saga::{Action, Pipeline};
use cw_adapters::{CronjobManager, ManifestStore};
use cw_core::{AppIdentity, LabelOptions, StateMap};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub image: String,
    pub deployed: Vec<String>,
    pub removed: Vec<String>,
    /// Stale jobs left behind because their removal failed
    pub stale_failures: Vec<String>,
}

/// The standard cronjob pipeline.
pub fn cronjob_pipeline<'a>() -> Pipeline<PipelineContext<'a>, CronjobError> {
    let actions: Vec<Box<dyn Action<PipelineContext<'a>, CronjobError>>> =
        vec![Box::new(UpdateCronjobs), Box::new(RemoveStaleCronjobs)];
    Pipeline::new(actions)
}

/// Runs cronjob reconciliations against one backend.
pub struct Reconciler<'a> {
    manager: &'a dyn CronjobManager,
    store: &'a dyn ManifestStore,
    labels: LabelOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        manager: &'a dyn CronjobManager,
        store: &'a dyn ManifestStore,
        labels: LabelOptions,
    ) -> Self {
        Self {
            manager,
            store,
            labels,
        }
    }

    /// Bring `app`'s cronjobs in line with `new_image` plus `overrides`.
    ///
    /// Cancelling `cancel` aborts the in-flight deploy and rolls back.
    pub async fn reconcile(
        &self,
        app: &AppIdentity,
        new_image: &str,
        overrides: &StateMap,
        cancel: Option<CancellationToken>,
    ) -> Result<ReconcileReport, CronjobError> {
        let resolved = resolve(self.store, app, new_image, overrides).await?;

        let mut ctx = PipelineContext::new(self.manager, app, new_image);
        ctx.desired = resolved.desired;
        ctx.current = resolved.current;
        ctx.previous_image = resolved.previous_image;
        ctx.cancel = cancel;
        ctx.labels = self.labels.clone();

        cronjob_pipeline().execute(&mut ctx).await?;

        if !ctx.stale_failures.is_empty() {
            tracing::warn!(
                app = %app.name,
                failed = ?ctx.stale_failures,
                "stale cronjobs left behind"
            );
        }
        Ok(ReconcileReport {
            image: new_image.to_string(),
            deployed: ctx.deployed,
            removed: ctx.removed,
            stale_failures: ctx.stale_failures,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
