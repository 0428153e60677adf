// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration and resolution failures exit with code 2 before any
//! cluster access.

use crate::prelude::*;

#[test]
fn missing_config_file() {
    let project = Project::billing();
    let missing = project.path().join("nope.toml");
    cli()
        .args(&["--config", missing.to_str().unwrap(), "plan"])
        .fails_with(2)
        .stderr_has("failed to read");
}

#[test]
fn unknown_app() {
    Project::billing()
        .cw()
        .args(&["--app", "checkout", "plan"])
        .fails_with(2)
        .stderr_has("unknown app: checkout");
}

#[test]
fn ambiguous_app_requires_flag() {
    let config = format!("{}\n[[apps]]\nname = \"search\"\n", BILLING_CONFIG);
    Project::with_config(&config)
        .cw()
        .args(&["plan"])
        .fails_with(2)
        .stderr_has("pass --app");
}

#[test]
fn image_without_manifest() {
    Project::billing()
        .cw()
        .args(&["plan", "registry/billing:v9"])
        .fails_with(2)
        .stderr_has("no manifest for image registry/billing:v9");
}

#[test]
fn unknown_grant_scheme_is_rejected() {
    let config = format!(
        "{}\n[[grants]]\nsubject = \"bob\"\npermission = \"app.update.cronjob.purge\"\n",
        BILLING_CONFIG
    );
    Project::with_config(&config)
        .cw()
        .args(&["delete", "invoices"])
        .fails_with(2)
        .stderr_has("unknown permission scheme: app.update.cronjob.purge");
}

#[test]
fn duplicate_override_is_rejected() {
    let project = Project::billing();
    let overrides = project.file(
        "overrides.toml",
        r#"cronjobs = [
            { name = "a", schedule = "1 * * * *" },
            { name = "a", schedule = "2 * * * *" },
        ]"#,
    );

    project
        .cw()
        .args(&["plan", "--override", overrides.to_str().unwrap()])
        .fails_with(2)
        .stderr_has("duplicate cronjob a");
}
