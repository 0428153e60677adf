// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Current/desired state resolution from image manifests.

use crate::error::CronjobError;
use cw_adapters::ManifestStore;
use cw_core::{AppIdentity, JobSpec, StateMap};

/// Both sides of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedState {
    /// Image the current jobs were declared by
    pub previous_image: Option<String>,
    pub current: StateMap,
    pub desired: StateMap,
}

fn state_map(jobs: Vec<JobSpec>) -> StateMap {
    jobs.into_iter()
        .map(|job| (job.name.clone(), job))
        .collect()
}

/// Resolve the jobs declared by `app`'s previous image and by `new_image`.
///
/// Overrides replace same-named declared jobs and add jobs the image does not
/// declare. An app with no previous image has an empty current state.
pub async fn resolve(
    store: &dyn ManifestStore,
    app: &AppIdentity,
    new_image: &str,
    overrides: &StateMap,
) -> Result<ResolvedState, CronjobError> {
    let previous_image = app.previous_image.clone();
    let current = match previous_image.as_deref() {
        Some(image) => state_map(store.declared_jobs(image).await?),
        None => StateMap::new(),
    };

    let mut desired = state_map(store.declared_jobs(new_image).await?);
    for (name, job) in overrides {
        let mut job = job.clone();
        job.name = name.clone();
        desired.insert(name.clone(), job);
    }

    tracing::debug!(
        app = %app.name,
        previous_image = previous_image.as_deref().unwrap_or("-"),
        new_image,
        current = current.len(),
        desired = desired.len(),
        overrides = overrides.len(),
        "resolved cronjob state"
    );
    Ok(ResolvedState {
        previous_image,
        current,
        desired,
    })
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
