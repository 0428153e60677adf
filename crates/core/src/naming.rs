// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend resource naming.
//!
//! Other components locate cronjob resources by these names, so the format
//! is a fixed contract: `sanitize(app) + "-" + sanitize(job)`.

/// Lower-case `s` and replace every character outside `[a-z0-9.-]` with `-`.
///
/// Replacement is per character, so multi-byte characters become a single
/// `-`. The result may be empty; the backend decides whether that is valid.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Backend resource name for `job_name` of application `app_name`.
pub fn derive_name(app_name: &str, job_name: &str) -> String {
    format!("{}-{}", sanitize(app_name), sanitize(job_name))
}

/// Service account the application's job pods run as.
pub fn service_account_name(app_name: &str) -> String {
    format!("app-{}", sanitize(app_name))
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
