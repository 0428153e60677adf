// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cw_adapters::ManifestStore;
use cw_core::{ConcurrencyPolicy, PermissionContext};
use serial_test::serial;
use std::io::Write;

const SAMPLE: &str = r#"
[kubernetes]
namespace = "tenants"
pool_namespaces = true
overcommit = { prod = 2 }

[[apps]]
name = "billing"
pool = "prod"
team_owner = "payments"
memory = 268435456
current_image = "registry/billing:v2"
previous_image = "registry/billing:v1"

[[apps]]
name = "search"

[images."registry/billing:v1"]
cronjobs = [{ name = "invoices", schedule = "0 3 * * *", command = "bin/invoices" }]

[images."registry/billing:v2"]
cronjobs = [
    { name = "invoices", schedule = "0 4 * * *", command = "bin/invoices", concurrencyPolicy = "Forbid" },
    { name = "reminders", schedule = "0 9 * * 1", command = "bin/remind", successfulJobsHistoryLimit = 5 },
]

[[grants]]
subject = "alice"
permission = "app.update.cronjob"
context = "team:payments"
"#;

fn sample() -> Config {
    Config::parse(SAMPLE, Path::new("cronwarden.toml")).unwrap()
}

fn write_file(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn parses_every_section() {
    let config = sample();

    assert_eq!(config.kubernetes.namespace, "tenants");
    assert!(config.kubernetes.pool_namespaces);
    assert_eq!(config.kubernetes.overcommit_for("prod"), 2);
    assert_eq!(config.kubernetes.label_prefix, "cronwarden.io/");
    assert_eq!(config.apps.len(), 2);
    assert_eq!(config.apps[0].memory, 268435456);
    let images: Vec<_> = config.images.keys().collect();
    assert_eq!(images, vec!["registry/billing:v1", "registry/billing:v2"]);
    let team = PermissionContext::Team("payments".to_string());
    assert_eq!(config.grants[0].context, team);
}

#[test]
fn empty_file_is_valid() {
    let config = Config::parse("", Path::new("empty.toml")).unwrap();
    assert!(config.apps.is_empty());
    assert_eq!(config.kubernetes, KubernetesConfig::default());
}

#[test]
fn parse_errors_name_the_file() {
    let err = Config::parse("apps = 3", Path::new("broken.toml")).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse broken.toml"));
}

#[test]
fn app_lookup() {
    let config = sample();
    assert_eq!(config.app(Some("search")).unwrap().name, "search");
    let unknown = config.app(Some("nope")).unwrap_err();
    assert!(matches!(unknown, ConfigError::UnknownApp(ref n) if n == "nope"));
    assert!(matches!(config.app(None), Err(ConfigError::AmbiguousApp(_))));
}

#[test]
fn single_app_is_the_default() {
    let mut config = sample();
    config.apps.truncate(1);
    assert_eq!(config.app(None).unwrap().name, "billing");

    config.apps.clear();
    assert!(matches!(config.app(None), Err(ConfigError::NoApps)));
}

#[tokio::test]
async fn manifest_store_serves_configured_images() {
    let store = sample().manifest_store();
    let jobs = store.declared_jobs("registry/billing:v2").await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].concurrency_policy, ConcurrencyPolicy::Forbid);
    assert_eq!(jobs[1].successful_runs_history_limit, 5);
}

#[test]
fn grant_table_rejects_unknown_schemes() {
    let mut config = sample();
    let registry = PermissionRegistry::with_cronjob_schemes();
    assert_eq!(config.grant_table(&registry).unwrap().len(), 1);

    config.grants[0].permission = "app.deploy".to_string();
    assert!(matches!(config.grant_table(&registry), Err(ConfigError::Grant(_))));
}

#[test]
#[serial]
fn load_applies_env_overrides() {
    let file = write_file(SAMPLE);
    std::env::set_var("CW_KUBE_NAMESPACE", "staging");
    std::env::set_var("CW_LABEL_PREFIX", "example.com/");

    let config = Config::load(file.path());
    std::env::remove_var("CW_KUBE_NAMESPACE");
    std::env::remove_var("CW_LABEL_PREFIX");

    let config = config.unwrap();
    assert_eq!(config.kubernetes.namespace, "staging");
    assert_eq!(config.kubernetes.label_prefix, "example.com/");
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn overrides_are_keyed_by_name() {
    let file = write_file(
        r#"cronjobs = [
            { name = "invoices", schedule = "30 1 * * *", command = "bin/invoices --fast" },
            { name = "audit", schedule = "0 0 1 * *", command = "bin/audit" },
        ]"#,
    );

    let overrides = load_overrides(file.path()).unwrap();

    assert_eq!(cw_core::sorted_keys(&overrides), vec!["audit", "invoices"]);
    assert_eq!(overrides["invoices"].schedule, "30 1 * * *");
}

#[test]
fn duplicate_override_is_rejected() {
    let file = write_file(
        r#"cronjobs = [
            { name = "invoices", schedule = "1 * * * *" },
            { name = "invoices", schedule = "2 * * * *" },
        ]"#,
    );

    let err = load_overrides(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateJob { ref job, .. } if job == "invoices"));
}
