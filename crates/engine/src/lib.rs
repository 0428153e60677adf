// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-engine: cronjob reconciliation and the operator command surface

pub mod auth;
pub mod cronjob;
mod error;
pub mod resolve;
pub mod saga;
pub mod service;

pub use auth::{Authorizer, Grant, GrantTable};
pub use cronjob::{JobChange, Plan, PlannedJob, ReconcileReport, Reconciler};
pub use error::CronjobError;
pub use resolve::{resolve, ResolvedState};
pub use saga::{Action, Pipeline};
pub use service::CronjobService;
