// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cw plan` specs: dry-run reconciliation from the config's manifests.

use crate::prelude::*;

#[test]
fn plan_shows_deploy_and_removal_order() {
    Project::billing()
        .cw()
        .args(&["plan", "registry/billing:v2"])
        .passes()
        .stdout_eq(
            "Plan for billing: registry/billing:v1 -> registry/billing:v2\n\
             \x20 ~ invoices (billing-invoices)\n\
             \x20 + reminders (billing-reminders)\n\
             \x20 - legacy_sync (billing-legacy-sync)\n",
        );
}

#[test]
fn plan_defaults_to_current_image() {
    Project::billing()
        .cw()
        .args(&["plan"])
        .passes()
        .stdout_has("-> registry/billing:v2");
}

#[test]
fn plan_to_previous_image_is_a_noop() {
    Project::billing()
        .cw()
        .args(&["plan", "registry/billing:v1"])
        .passes()
        .stdout_has("No changes");
}

/// Same job definition on both images
const REBUILD_CONFIG: &str = r#"
[[apps]]
name = "billing"
current_image = "registry/billing:v3"
previous_image = "registry/billing:v2"

[images."registry/billing:v2"]
cronjobs = [{ name = "invoices", schedule = "0 4 * * *", command = "bin/invoices" }]

[images."registry/billing:v3"]
cronjobs = [{ name = "invoices", schedule = "0 4 * * *", command = "bin/invoices" }]
"#;

#[test]
fn plan_updates_unchanged_jobs_on_a_new_image() {
    Project::with_config(REBUILD_CONFIG)
        .cw()
        .args(&["plan", "registry/billing:v3"])
        .passes()
        .stdout_eq(
            "Plan for billing: registry/billing:v2 -> registry/billing:v3\n\
             \x20 ~ invoices (billing-invoices)\n",
        );
}

#[test]
fn plan_json_output() {
    let run = Project::billing()
        .cw()
        .args(&["plan", "-o", "json"])
        .passes();
    let plan = run.stdout_json();

    assert_eq!(plan["app"], "billing");
    assert_eq!(plan["deploy"][0]["name"], "invoices");
    assert_eq!(plan["deploy"][0]["change"], "update");
    assert_eq!(plan["deploy"][1]["change"], "create");
    assert_eq!(plan["remove"][0]["backend_name"], "billing-legacy-sync");
}

#[test]
fn plan_applies_override_file() {
    let project = Project::billing();
    let overrides = project.file(
        "overrides.toml",
        r#"cronjobs = [
            { name = "legacy_sync", schedule = "0 0 * * *", command = "bin/sync --final" },
        ]"#,
    );

    project
        .cw()
        .args(&["plan", "--override", overrides.to_str().unwrap()])
        .passes()
        .stdout_has("~ legacy_sync (billing-legacy-sync)");
}

#[test]
fn plan_reads_config_from_env() {
    let project = Project::billing();
    cli()
        .env("CW_CONFIG", project.config().to_str().unwrap())
        .args(&["plan"])
        .passes()
        .stdout_has("Plan for billing");
}

#[test]
fn plan_finds_default_config_in_working_dir() {
    let project = Project::billing();
    cli()
        .current_dir(project.path())
        .args(&["plan"])
        .passes()
        .stdout_has("Plan for billing");
}
