// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dry-run view of a reconciliation

use crate::error::CronjobError;
use crate::resolve::resolve;
use cw_adapters::ManifestStore;
use cw_core::{derive_name, difference, sorted_keys, AppIdentity, StateMap};
use serde::Serialize;

/// How a desired or stale job differs from what the previous image declared.
///
/// A job keeps `Unchanged` only when both its spec and its image are the same;
/// a spec-identical job moving to a new image is an `Update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobChange {
    Create,
    Update,
    Unchanged,
    Remove,
}

cw_core::simple_display! {
    JobChange {
        Create => "create",
        Update => "update",
        Unchanged => "unchanged",
        Remove => "remove",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedJob {
    pub name: String,
    pub backend_name: String,
    pub change: JobChange,
}

/// What a reconciliation would do, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub app: String,
    pub previous_image: Option<String>,
    pub new_image: String,
    /// Every desired job; all are redeployed
    pub deploy: Vec<PlannedJob>,
    pub remove: Vec<PlannedJob>,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.deploy.iter().all(|j| j.change == JobChange::Unchanged)
    }
}

/// Resolve state and report the deploy and removal order without touching a backend.
pub async fn plan(
    store: &dyn ManifestStore,
    app: &AppIdentity,
    new_image: &str,
    overrides: &StateMap,
) -> Result<Plan, CronjobError> {
    let resolved = resolve(store, app, new_image, overrides).await?;
    let image_changed = resolved.previous_image.as_deref() != Some(new_image);
    let planned = |name: String, change: JobChange| PlannedJob {
        backend_name: derive_name(&app.name, &name),
        name,
        change,
    };

    let deploy = sorted_keys(&resolved.desired)
        .into_iter()
        .map(|name| {
            let change = match resolved.current.get(&name) {
                None => JobChange::Create,
                Some(_) if image_changed => JobChange::Update,
                Some(current) if Some(current) == resolved.desired.get(&name) => {
                    JobChange::Unchanged
                }
                Some(_) => JobChange::Update,
            };
            planned(name, change)
        })
        .collect();
    let remove = difference(&resolved.current, &resolved.desired)
        .into_iter()
        .map(|name| planned(name, JobChange::Remove))
        .collect();

    Ok(Plan {
        app: app.name.clone(),
        previous_image: resolved.previous_image,
        new_image: new_image.to_string(),
        deploy,
        remove,
    })
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
