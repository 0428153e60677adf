// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn cw_no_args_shows_usage_and_fails() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn cw_help_lists_commands() {
    let run = cli().args(&["--help"]).passes().stdout_has("Usage:");
    for command in ["deploy", "plan", "add", "list", "update", "delete"] {
        assert!(run.stdout().contains(command), "help missing {}", command);
    }
}

#[test]
fn cw_add_help_shows_job_fields() {
    cli()
        .args(&["add", "--help"])
        .passes()
        .stdout_has("--schedule")
        .stdout_has("--command")
        .stdout_has("--concurrency-policy");
}

#[test]
fn cw_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}
