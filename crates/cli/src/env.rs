// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Namespace override for the Kubernetes backend
pub fn kube_namespace() -> Option<String> {
    non_empty("CW_KUBE_NAMESPACE")
}

pub fn label_prefix() -> Option<String> {
    non_empty("CW_LABEL_PREFIX")
}

/// Acting subject: CW_SUBJECT > USER > "anonymous"
pub fn subject() -> String {
    non_empty("CW_SUBJECT")
        .or_else(|| non_empty("USER"))
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Log filter directive (default `info`)
pub fn log_filter() -> String {
    non_empty("CW_LOG").unwrap_or_else(|| "info".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
