// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CronJob manifest construction and parsing.

use cw_core::{
    derive_name, service_account_name, AppIdentity, ConcurrencyPolicy, JobSpec, LabelOptions,
    LabelSet,
};
use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, JobSpec as PodJobSpec, JobTemplateSpec};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, LocalObjectReference, PodSecurityContext, PodSpec, PodTemplateSpec,
    ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Shell prefix run before the job's command inside the container.
const COMMAND_PREFIX: &str =
    "[ -d /home/application/current ] && cd /home/application/current; exec ";

/// Everything needed to render one CronJob.
pub(super) struct CronjobParams<'a> {
    pub app: &'a AppIdentity,
    pub job: &'a JobSpec,
    pub labels: &'a LabelSet,
    pub image: &'a str,
    pub namespace: String,
    pub node_selector: BTreeMap<String, String>,
    /// Memory request is the limit divided by this factor
    pub overcommit: i64,
    pub run_as_user: Option<i64>,
    pub pull_secrets: &'a [String],
}

/// Wrap a job command for `/bin/sh -lc`.
pub fn wrap_command(command: &str) -> Vec<String> {
    vec![
        "/bin/sh".to_string(),
        "-lc".to_string(),
        format!("{}{}", COMMAND_PREFIX, command),
    ]
}

/// Inverse of [`wrap_command`]; `None` for commands this crate did not build.
pub fn unwrap_command(command: &[String]) -> Option<String> {
    match command {
        [sh, flag, script] if sh == "/bin/sh" && flag == "-lc" => {
            script.strip_prefix(COMMAND_PREFIX).map(str::to_string)
        }
        _ => None,
    }
}

fn history_limit(limit: u32) -> Option<i32> {
    if limit == 0 {
        None
    } else {
        Some(i32::try_from(limit).unwrap_or(i32::MAX))
    }
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn resources(app: &AppIdentity, overcommit: i64) -> ResourceRequirements {
    let mut limits = BTreeMap::new();
    let mut requests = BTreeMap::new();
    if app.memory > 0 {
        limits.insert("memory".to_string(), Quantity(app.memory.to_string()));
        let request = app.memory / overcommit.max(1);
        requests.insert("memory".to_string(), Quantity(request.to_string()));
    }
    if app.cpu_milli > 0 {
        limits.insert("cpu".to_string(), Quantity(format!("{}m", app.cpu_milli)));
    }
    ResourceRequirements {
        limits: Some(limits),
        requests: Some(requests),
        ..Default::default()
    }
}

/// Build the CronJob for one job of an application.
pub(super) fn build_cronjob(params: &CronjobParams<'_>) -> CronJob {
    let name = derive_name(&params.app.name, &params.job.name);
    let meta = || ObjectMeta {
        labels: Some(params.labels.labels.clone()),
        annotations: Some(params.labels.annotations.clone()),
        ..Default::default()
    };

    let mut env = vec![
        env_var("CW_APPNAME", &params.app.name),
        env_var("CW_PROCESSNAME", &params.job.name),
    ];
    env.extend(params.app.env.iter().map(|(k, v)| env_var(k, v)));

    let container = Container {
        name: name.clone(),
        image: Some(params.image.to_string()),
        command: Some(wrap_command(&params.job.command)),
        env: Some(env),
        resources: Some(resources(params.app, params.overcommit)),
        ..Default::default()
    };

    let pull_secrets = if params.pull_secrets.is_empty() {
        None
    } else {
        Some(
            params
                .pull_secrets
                .iter()
                .map(|s| LocalObjectReference {
                    name: s.clone(),
                    ..Default::default()
                })
                .collect(),
        )
    };

    let security_context = params.run_as_user.map(|uid| PodSecurityContext {
        run_as_user: Some(uid),
        ..Default::default()
    });

    let pod_spec = PodSpec {
        containers: vec![container],
        restart_policy: Some("Never".to_string()),
        service_account_name: Some(service_account_name(&params.app.name)),
        node_selector: Some(params.node_selector.clone()),
        security_context,
        image_pull_secrets: pull_secrets,
        ..Default::default()
    };

    CronJob {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(params.namespace.clone()),
            ..meta()
        },
        spec: Some(CronJobSpec {
            schedule: params.job.schedule.clone(),
            concurrency_policy: Some(params.job.concurrency_policy.to_string()),
            suspend: Some(params.job.suspend),
            successful_jobs_history_limit: history_limit(params.job.successful_runs_history_limit),
            failed_jobs_history_limit: history_limit(params.job.failed_runs_history_limit),
            job_template: JobTemplateSpec {
                metadata: Some(meta()),
                spec: Some(PodJobSpec {
                    template: PodTemplateSpec {
                        metadata: Some(meta()),
                        spec: Some(pod_spec),
                    },
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Labels and annotations recorded on a live CronJob.
pub(super) fn labels_of(cronjob: &CronJob) -> LabelSet {
    LabelSet {
        labels: cronjob.metadata.labels.clone().unwrap_or_default(),
        annotations: cronjob.metadata.annotations.clone().unwrap_or_default(),
    }
}

/// Recover the [`JobSpec`] a CronJob was built from.
///
/// Returns `None` when the resource carries no job name.
pub(super) fn job_spec_from_cronjob(cronjob: &CronJob, opts: &LabelOptions) -> Option<JobSpec> {
    let labels = labels_of(cronjob);
    let name = opts.job_name(&labels)?.to_string();
    let spec = cronjob.spec.as_ref()?;
    let command = spec
        .job_template
        .spec
        .as_ref()
        .and_then(|s| s.template.spec.as_ref())
        .and_then(|p| p.containers.first())
        .and_then(|c| c.command.as_deref())
        .and_then(unwrap_command)
        .unwrap_or_default();
    let limit = |v: Option<i32>| v.and_then(|n| u32::try_from(n).ok()).unwrap_or(0);

    Some(JobSpec {
        name,
        schedule: spec.schedule.clone(),
        concurrency_policy: spec
            .concurrency_policy
            .as_deref()
            .and_then(|p| p.parse::<ConcurrencyPolicy>().ok())
            .unwrap_or_default(),
        command,
        suspend: spec.suspend.unwrap_or(false),
        successful_runs_history_limit: limit(spec.successful_jobs_history_limit),
        failed_runs_history_limit: limit(spec.failed_jobs_history_limit),
    })
}

#[cfg(test)]
#[path = "cronjob_tests.rs"]
mod tests;
