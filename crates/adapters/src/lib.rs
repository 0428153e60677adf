// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-adapters: execution backends and image manifest sources

pub mod backend;
pub mod kubernetes;
pub mod manifest;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use backend::{BackendError, CronjobManager, CronjobProvisioner, Provisioner};
pub use kubernetes::{KubernetesConfig, KubernetesProvisioner};
pub use manifest::{InMemoryManifestStore, ManifestError, ManifestStore};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{CronjobCall, FakeCronjob, FakeCronjobBackend};
