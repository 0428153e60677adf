// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator command surface for an app's cronjobs.
//!
//! Every command checks the caller's permission in the app's contexts, then
//! asks the configured provisioner for the cronjob capability it needs. Each
//! outcome is recorded on the `cronwarden::audit` tracing target.

use crate::auth::Authorizer;
use crate::cronjob::{plan, Plan, ReconcileReport, Reconciler};
use crate::error::CronjobError;
use cw_adapters::{CronjobManager, CronjobProvisioner, ManifestStore, Provisioner};
use cw_core::{
    derive_labels, derive_name, AppIdentity, JobSpec, JobSpecPatch, Permission, PermissionContext,
    StateMap,
};
use tokio_util::sync::CancellationToken;

const AUDIT: &str = "cronwarden::audit";

pub struct CronjobService<'a> {
    provisioner: &'a dyn Provisioner,
    store: &'a dyn ManifestStore,
    authorizer: &'a dyn Authorizer,
}

impl<'a> CronjobService<'a> {
    pub fn new(
        provisioner: &'a dyn Provisioner,
        store: &'a dyn ManifestStore,
        authorizer: &'a dyn Authorizer,
    ) -> Self {
        Self {
            provisioner,
            store,
            authorizer,
        }
    }

    fn authorize(
        &self,
        subject: &str,
        permission: Permission,
        app: &AppIdentity,
    ) -> Result<(), CronjobError> {
        let contexts = PermissionContext::for_app(app);
        let allowed = self.authorizer.check(subject, permission, &contexts);
        tracing::info!(
            target: AUDIT,
            subject,
            permission = %permission,
            app = %app.name,
            allowed,
            "authorization"
        );
        if allowed {
            Ok(())
        } else {
            Err(CronjobError::Forbidden {
                subject: subject.to_string(),
                permission,
                app: app.name.clone(),
            })
        }
    }

    fn manager(&self) -> Result<&'a dyn CronjobManager, CronjobError> {
        self.provisioner
            .cronjob_manager()
            .ok_or_else(|| CronjobError::CapabilityMismatch(self.provisioner.name().to_string()))
    }

    fn reader(&self) -> Result<&'a dyn CronjobProvisioner, CronjobError> {
        self.provisioner
            .cronjob_provisioner()
            .ok_or_else(|| CronjobError::CapabilityMismatch(self.provisioner.name().to_string()))
    }

    async fn deploy_one(&self, app: &AppIdentity, job: &JobSpec) -> Result<(), CronjobError> {
        let manager = self.manager()?;
        let image = app
            .current_image
            .as_deref()
            .ok_or_else(|| CronjobError::NoImage(app.name.clone()))?;
        let labels = derive_labels(app, &job.name, &self.provisioner.label_options());
        let token = CancellationToken::new();
        manager.deploy_job(&token, app, job, &labels, image).await?;
        Ok(())
    }

    /// Create or update `job` with the app's current image.
    ///
    /// Returns the backend resource name.
    pub async fn add(
        &self,
        subject: &str,
        app: &AppIdentity,
        job: JobSpec,
    ) -> Result<String, CronjobError> {
        self.authorize(subject, Permission::CronjobAdd, app)?;
        if job.name.trim().is_empty() {
            return Err(CronjobError::InvalidJob("name is required".to_string()));
        }
        if job.schedule.trim().is_empty() {
            return Err(CronjobError::InvalidJob(format!("{}: schedule is required", job.name)));
        }
        self.deploy_one(app, &job).await?;
        tracing::info!(target: AUDIT, subject, app = %app.name, job = %job.name, "cronjob added");
        Ok(derive_name(&app.name, &job.name))
    }

    pub async fn list(
        &self,
        subject: &str,
        app: &AppIdentity,
    ) -> Result<Vec<JobSpec>, CronjobError> {
        self.authorize(subject, Permission::CronjobList, app)?;
        Ok(self.reader()?.list_jobs(app).await?)
    }

    /// Apply `patch` to the deployed job named `name` and redeploy it.
    pub async fn update(
        &self,
        subject: &str,
        app: &AppIdentity,
        name: &str,
        patch: &JobSpecPatch,
    ) -> Result<JobSpec, CronjobError> {
        self.authorize(subject, Permission::CronjobAdd, app)?;
        let existing = self
            .reader()?
            .get_job(app, name)
            .await?
            .ok_or_else(|| CronjobError::JobNotFound {
                app: app.name.clone(),
                job: name.to_string(),
            })?;
        let updated = patch.apply(&existing);
        self.deploy_one(app, &updated).await?;
        tracing::info!(target: AUDIT, subject, app = %app.name, job = name, "cronjob updated");
        Ok(updated)
    }

    /// Remove the job named `name`. Removing a missing job succeeds.
    pub async fn delete(
        &self,
        subject: &str,
        app: &AppIdentity,
        name: &str,
    ) -> Result<(), CronjobError> {
        self.authorize(subject, Permission::CronjobDelete, app)?;
        self.manager()?.remove_job(app, name).await?;
        tracing::info!(target: AUDIT, subject, app = %app.name, job = name, "cronjob deleted");
        Ok(())
    }

    /// Reconcile the app's cronjobs for `new_image`.
    pub async fn deploy(
        &self,
        subject: &str,
        app: &AppIdentity,
        new_image: &str,
        overrides: &StateMap,
        cancel: Option<CancellationToken>,
    ) -> Result<ReconcileReport, CronjobError> {
        self.authorize(subject, Permission::CronjobAdd, app)?;
        let manager = self.manager()?;
        let reconciler = Reconciler::new(manager, self.store, self.provisioner.label_options());
        let result = reconciler
            .reconcile(app, new_image, overrides, cancel)
            .await;
        match &result {
            Ok(report) => tracing::info!(
                target: AUDIT,
                subject,
                app = %app.name,
                image = new_image,
                deployed = report.deployed.len(),
                removed = report.removed.len(),
                "cronjobs reconciled"
            ),
            Err(e) => tracing::error!(
                target: AUDIT,
                subject,
                app = %app.name,
                image = new_image,
                error = %e,
                "cronjob reconciliation failed"
            ),
        }
        result
    }

    /// Dry run of [`deploy`](Self::deploy); never touches the backend.
    pub async fn plan(
        &self,
        app: &AppIdentity,
        new_image: &str,
        overrides: &StateMap,
    ) -> Result<Plan, CronjobError> {
        plan(self.store, app, new_image, overrides).await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
