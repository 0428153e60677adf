// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image manifest store: the jobs each built image declares.

use async_trait::async_trait;
use cw_core::JobSpec;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors from loading an image manifest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("no manifest for image {0}")]
    ImageNotFound(String),
    #[error("invalid manifest for image {image}: {reason}")]
    Invalid { image: String, reason: String },
}

/// Source of the jobs declared in an image.
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Jobs declared by `image`, in declaration order. May be empty.
    ///
    /// Names are unique within one image.
    async fn declared_jobs(&self, image: &str) -> Result<Vec<JobSpec>, ManifestError>;
}

/// Manifest store held in memory.
///
/// Loaded from configuration by the CLI and used directly by tests.
#[derive(Clone, Default)]
pub struct InMemoryManifestStore {
    images: Arc<RwLock<HashMap<String, Vec<JobSpec>>>>,
}

impl InMemoryManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the jobs declared by `image`, replacing earlier data.
    pub fn insert(&self, image: impl Into<String>, jobs: Vec<JobSpec>) {
        self.images.write().insert(image.into(), jobs);
    }

    pub fn with_image(self, image: impl Into<String>, jobs: Vec<JobSpec>) -> Self {
        self.insert(image, jobs);
        self
    }

    pub fn contains(&self, image: &str) -> bool {
        self.images.read().contains_key(image)
    }
}

#[async_trait]
impl ManifestStore for InMemoryManifestStore {
    async fn declared_jobs(&self, image: &str) -> Result<Vec<JobSpec>, ManifestError> {
        let images = self.images.read();
        let jobs = images
            .get(image)
            .ok_or_else(|| ManifestError::ImageNotFound(image.to_string()))?;
        let mut seen = HashSet::new();
        if let Some(dup) = jobs.iter().find(|j| !seen.insert(j.name.as_str())) {
            return Err(ManifestError::Invalid {
                image: image.to_string(),
                reason: format!("job {:?} declared more than once", dup.name),
            });
        }
        Ok(jobs.clone())
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
