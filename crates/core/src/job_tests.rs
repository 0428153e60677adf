// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    allow_exact   = { "Allow",   ConcurrencyPolicy::Allow },
    forbid_lower  = { "forbid",  ConcurrencyPolicy::Forbid },
    replace_upper = { "REPLACE", ConcurrencyPolicy::Replace },
)]
fn concurrency_policy_parses_case_insensitively(input: &str, expected: ConcurrencyPolicy) {
    assert_eq!(input.parse::<ConcurrencyPolicy>().unwrap(), expected);
}

#[test]
fn concurrency_policy_rejects_unknown() {
    let err = "sometimes".parse::<ConcurrencyPolicy>().unwrap_err();
    assert_eq!(err, ParseError::ConcurrencyPolicy("sometimes".to_string()));
}

#[test]
fn concurrency_policy_displays_backend_value() {
    assert_eq!(ConcurrencyPolicy::Forbid.to_string(), "Forbid");
}

#[test]
fn manifest_entry_with_only_name_uses_defaults() {
    let spec: JobSpec = serde_json::from_str(r#"{"name": "web"}"#).unwrap();
    assert_eq!(spec, JobSpec::new("web"));
    assert_eq!(spec.concurrency_policy, ConcurrencyPolicy::Allow);
}

#[test]
fn manifest_entry_reads_camel_case_fields() {
    let spec: JobSpec = serde_json::from_str(
        r#"{
            "name": "report",
            "schedule": "0 3 * * *",
            "concurrencyPolicy": "Forbid",
            "command": "./report.sh",
            "suspend": true,
            "successfulJobsHistoryLimit": 3,
            "failedRunsHistoryLimit": 1
        }"#,
    )
    .unwrap();
    assert_eq!(spec.schedule, "0 3 * * *");
    assert_eq!(spec.concurrency_policy, ConcurrencyPolicy::Forbid);
    assert!(spec.suspend);
    assert_eq!(spec.successful_runs_history_limit, 3);
    assert_eq!(spec.failed_runs_history_limit, 1);
}

#[test]
fn patch_with_schedule_and_command_keeps_other_fields() {
    let stored = JobSpec::builder()
        .name("report")
        .concurrency_policy(ConcurrencyPolicy::Replace)
        .suspend(true)
        .successful_runs_history_limit(5)
        .failed_runs_history_limit(2)
        .build();
    let patch = JobSpecPatch {
        schedule: Some("0 * * * *".to_string()),
        command: Some("./new.sh".to_string()),
        ..Default::default()
    };

    let updated = patch.apply(&stored);

    assert_eq!(updated.name, "report");
    assert_eq!(updated.schedule, "0 * * * *");
    assert_eq!(updated.command, "./new.sh");
    assert_eq!(updated.concurrency_policy, ConcurrencyPolicy::Replace);
    assert!(updated.suspend);
    assert_eq!(updated.successful_runs_history_limit, 5);
    assert_eq!(updated.failed_runs_history_limit, 2);
}

#[test]
fn patch_ignores_blank_strings() {
    let stored = JobSpec::builder().build();
    let patch = JobSpecPatch {
        schedule: Some(String::new()),
        command: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(patch.apply(&stored), stored);
}

#[test]
fn patch_can_clear_suspend() {
    let stored = JobSpec::builder().suspend(true).build();
    let patch = JobSpecPatch {
        suspend: Some(false),
        ..Default::default()
    };
    assert!(!patch.apply(&stored).suspend);
}

#[test]
fn empty_patch_is_empty() {
    assert!(JobSpecPatch::default().is_empty());

    let suspend_only = JobSpecPatch {
        suspend: Some(true),
        ..Default::default()
    };
    assert!(!suspend_only.is_empty());
}
