// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use cw_engine::CronjobError;
use std::fmt;

/// Generic failure
pub const EXIT_FAILURE: i32 = 1;
/// Usage or configuration problem
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_FORBIDDEN: i32 = 3;
pub const EXIT_NOT_FOUND: i32 = 4;
/// Provisioner cannot run cronjobs
pub const EXIT_UNSUPPORTED: i32 = 5;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<CronjobError> for ExitError {
    fn from(err: CronjobError) -> Self {
        let code = match &err {
            CronjobError::Forbidden { .. } => EXIT_FORBIDDEN,
            CronjobError::JobNotFound { .. } => EXIT_NOT_FOUND,
            CronjobError::CapabilityMismatch(_) => EXIT_UNSUPPORTED,
            CronjobError::Resolution(_)
            | CronjobError::NoImage(_)
            | CronjobError::InvalidJob(_) => EXIT_CONFIG,
            CronjobError::Backend(_) => EXIT_FAILURE,
        };
        Self::new(code, err.to_string())
    }
}

impl From<crate::config::ConfigError> for ExitError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::new(EXIT_CONFIG, err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
