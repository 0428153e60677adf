// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-core: value types for the cronwarden cronjob reconciler

pub mod macros;

pub mod app;
pub mod diff;
pub mod job;
pub mod labels;
pub mod naming;
pub mod permission;

pub use app::AppIdentity;
pub use diff::{difference, sorted_keys};
pub use job::{ConcurrencyPolicy, JobSpec, JobSpecPatch, ParseError, StateMap};
pub use labels::{app_selector, derive_labels, LabelOptions, LabelSet};
pub use naming::{derive_name, sanitize, service_account_name};
pub use permission::{
    scheme_covers, Permission, PermissionContext, PermissionRegistry, RegistryError,
};

#[cfg(any(test, feature = "test-support"))]
pub use app::AppIdentityBuilder;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobSpecBuilder;
