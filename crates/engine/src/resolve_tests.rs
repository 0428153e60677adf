// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cw_adapters::{InMemoryManifestStore, ManifestError};

const V1: &str = "registry/myapp:v1";
const V2: &str = "registry/myapp:v2";

fn job(name: &str, schedule: &str) -> JobSpec {
    JobSpec::builder().name(name).schedule(schedule).build()
}

fn store() -> InMemoryManifestStore {
    let v1 = vec![job("web", "0 * * * *"), job("worker1", "5 * * * *")];
    let v2 = vec![job("web", "*/10 * * * *"), job("worker1", "5 * * * *")];
    InMemoryManifestStore::new()
        .with_image(V1, v1)
        .with_image(V2, v2)
}

fn names(map: &StateMap) -> Vec<String> {
    cw_core::sorted_keys(map)
}

async fn resolve_plain(
    store: &InMemoryManifestStore,
    app: &AppIdentity,
    new_image: &str,
) -> Result<ResolvedState, CronjobError> {
    resolve(store, app, new_image, &StateMap::new()).await
}

#[tokio::test]
async fn current_comes_from_previous_image() {
    let app = AppIdentity::builder().build();
    let resolved = resolve_plain(&store(), &app, V2).await.unwrap();

    assert_eq!(resolved.previous_image.as_deref(), Some(V1));
    assert_eq!(names(&resolved.current), vec!["web", "worker1"]);
    assert_eq!(resolved.current["web"].schedule, "0 * * * *");
    assert_eq!(resolved.desired["web"].schedule, "*/10 * * * *");
}

#[tokio::test]
async fn override_replaces_declared_job() {
    let app = AppIdentity::builder().build();
    let replacement = job("worker1", "30 2 * * *");
    let overrides = StateMap::from([("worker1".to_string(), replacement.clone())]);

    let resolved = resolve(&store(), &app, V2, &overrides).await.unwrap();

    assert_eq!(resolved.desired.len(), 2);
    assert_eq!(resolved.desired["worker1"], replacement);
    assert_eq!(resolved.desired["web"], job("web", "*/10 * * * *"));
}

#[tokio::test]
async fn override_only_jobs_are_included() {
    let app = AppIdentity::builder().build();
    let reports = job("reports", "0 6 * * 1");
    let overrides = StateMap::from([("reports".to_string(), reports)]);

    let resolved = resolve(&store(), &app, V2, &overrides).await.unwrap();

    assert_eq!(
        names(&resolved.desired),
        vec!["reports", "web", "worker1"]
    );
}

#[tokio::test]
async fn override_takes_its_key_as_name() {
    let app = AppIdentity::builder().build();
    let overrides = StateMap::from([("worker1".to_string(), job("", "1 1 * * *"))]);

    let resolved = resolve(&store(), &app, V2, &overrides).await.unwrap();

    assert_eq!(resolved.desired["worker1"].name, "worker1");
}

#[tokio::test]
async fn first_deploy_has_empty_current_state() {
    let app = AppIdentity::builder().previous_image(None).build();
    let resolved = resolve_plain(&store(), &app, V2).await.unwrap();

    assert!(resolved.previous_image.is_none());
    assert!(resolved.current.is_empty());
    assert_eq!(names(&resolved.desired), vec!["web", "worker1"]);
}

#[tokio::test]
async fn image_without_jobs_resolves_empty_desired() {
    let store = store().with_image("registry/myapp:v3", vec![]);
    let app = AppIdentity::builder().build();

    let resolved = resolve_plain(&store, &app, "registry/myapp:v3")
        .await
        .unwrap();

    assert!(resolved.desired.is_empty());
    assert_eq!(resolved.current.len(), 2);
}

#[tokio::test]
async fn missing_new_manifest_is_a_resolution_error() {
    let app = AppIdentity::builder().build();
    let err = resolve_plain(&store(), &app, "registry/myapp:v9")
        .await
        .unwrap_err();

    let missing = ManifestError::ImageNotFound("registry/myapp:v9".to_string());
    assert_eq!(err, CronjobError::Resolution(missing));
}

#[tokio::test]
async fn missing_previous_manifest_is_a_resolution_error() {
    let app = AppIdentity::builder()
        .previous_image(Some("registry/myapp:v0".to_string()))
        .build();
    let err = resolve_plain(&store(), &app, V2).await.unwrap_err();

    let missing = ManifestError::ImageNotFound("registry/myapp:v0".to_string());
    assert_eq!(err, CronjobError::Resolution(missing));
}
