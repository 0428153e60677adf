// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cronwarden.toml` loading.
//!
//! ```toml
//! [kubernetes]
//! namespace = "tenants"
//!
//! [[apps]]
//! name = "billing"
//! current_image = "registry/billing:v2"
//! previous_image = "registry/billing:v1"
//!
//! [images."registry/billing:v2"]
//! cronjobs = [{ name = "invoices", schedule = "0 3 * * *", command = "bin/invoices" }]
//!
//! [[grants]]
//! subject = "alice"
//! permission = "app.update.cronjob"
//! context = "team:payments"
//! ```

use crate::env;
use cw_adapters::{InMemoryManifestStore, KubernetesConfig};
use cw_core::{AppIdentity, JobSpec, PermissionRegistry, RegistryError, StateMap};
use cw_engine::{Grant, GrantTable};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unknown app: {0}")]
    UnknownApp(String),
    #[error("no apps configured")]
    NoApps,
    #[error("several apps configured ({0}); pass --app")]
    AmbiguousApp(String),
    #[error("invalid grant: {0}")]
    Grant(#[from] RegistryError),
    #[error("duplicate cronjob {job} in {path}")]
    DuplicateJob { job: String, path: PathBuf },
}

/// Jobs declared by one image
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageManifest {
    #[serde(default)]
    pub cronjobs: Vec<JobSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kubernetes: KubernetesConfig,
    pub apps: Vec<AppIdentity>,
    /// Keyed by image reference, in file order
    pub images: IndexMap<String, ImageManifest>,
    pub grants: Vec<Grant>,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        parse_toml(text, path)
    }

    /// Read `path` and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = read(path)?;
        let mut config = Self::parse(&text, path)?;
        config.apply_env();
        tracing::debug!(
            path = %path.display(),
            apps = config.apps.len(),
            images = config.images.len(),
            grants = config.grants.len(),
            "loaded config"
        );
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Some(namespace) = env::kube_namespace() {
            self.kubernetes.namespace = namespace;
        }
        if let Some(prefix) = env::label_prefix() {
            self.kubernetes.label_prefix = prefix;
        }
    }

    /// The app named `name`, or the only configured app when `name` is `None`.
    pub fn app(&self, name: Option<&str>) -> Result<&AppIdentity, ConfigError> {
        match name {
            Some(name) => self
                .apps
                .iter()
                .find(|a| a.name == name)
                .ok_or_else(|| ConfigError::UnknownApp(name.to_string())),
            None => match self.apps.as_slice() {
                [] => Err(ConfigError::NoApps),
                [only] => Ok(only),
                many => {
                    let names: Vec<_> = many.iter().map(|a| a.name.as_str()).collect();
                    Err(ConfigError::AmbiguousApp(names.join(", ")))
                }
            },
        }
    }

    pub fn manifest_store(&self) -> InMemoryManifestStore {
        let store = InMemoryManifestStore::new();
        for (image, manifest) in &self.images {
            store.insert(image.clone(), manifest.cronjobs.clone());
        }
        store
    }

    pub fn grant_table(&self, registry: &PermissionRegistry) -> Result<GrantTable, ConfigError> {
        Ok(GrantTable::new(registry, self.grants.clone())?)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })
}

fn parse_toml<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Load an override file (same shape as an image manifest) into a state map.
pub fn load_overrides(path: &Path) -> Result<StateMap, ConfigError> {
    let manifest: ImageManifest = parse_toml(&read(path)?, path)?;

    let mut overrides = StateMap::new();
    for job in manifest.cronjobs {
        if overrides.contains_key(&job.name) {
            return Err(ConfigError::DuplicateJob {
                job: job.name,
                path: path.to_owned(),
            });
        }
        overrides.insert(job.name.clone(), job);
    }
    Ok(overrides)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
