// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for running `cw` against a throwaway config.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;

/// Config with one app moving from v1 to v2
pub const BILLING_CONFIG: &str = r#"
[[apps]]
name = "billing"
team_owner = "payments"
current_image = "registry/billing:v2"
previous_image = "registry/billing:v1"

[images."registry/billing:v1"]
cronjobs = [
    { name = "invoices", schedule = "0 3 * * *", command = "bin/invoices" },
    { name = "legacy_sync", schedule = "*/30 * * * *", command = "bin/sync" },
]

[images."registry/billing:v2"]
cronjobs = [
    { name = "invoices", schedule = "0 4 * * *", command = "bin/invoices" },
    { name = "reminders", schedule = "0 9 * * 1", command = "bin/remind" },
]

[[grants]]
subject = "alice"
permission = "app.update.cronjob"
context = "app:billing"
"#;

/// Temporary directory holding a `cronwarden.toml`.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn with_config(config: &str) -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        project.file("cronwarden.toml", config);
        project
    }

    pub fn billing() -> Self {
        Self::with_config(BILLING_CONFIG)
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("cronwarden.toml")
    }

    /// `cw` with `--config` pointing at this project.
    pub fn cw(&self) -> CliBuilder {
        let mut builder = cli();
        builder.cmd.arg("--config").arg(self.config());
        builder
    }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

/// Path to the `cw` binary.
///
/// Cargo only sets `CARGO_BIN_EXE_cw` for tests of the `cronwarden` package. Here the
/// binary is taken from the profile directory of this test executable, which
/// `cargo test --workspace` populates. Running this package alone builds it on first use.
fn cw_binary() -> &'static Path {
    static BINARY: OnceLock<PathBuf> = OnceLock::new();
    BINARY.get_or_init(|| {
        if let Some(path) = std::env::var_os("CARGO_BIN_EXE_cw") {
            return PathBuf::from(path);
        }
        // target/<profile>/deps/specs-<hash>
        let exe = std::env::current_exe().unwrap();
        let profile_dir = exe.parent().and_then(Path::parent).unwrap();
        let path = profile_dir.join(CW_FILE_NAME);
        if path.exists() {
            return path;
        }
        build_cw(profile_dir)
    })
}

const CW_FILE_NAME: &str = if cfg!(windows) { "cw.exe" } else { "cw" };

/// Build `cw` into a separate target dir so the outer cargo's lock is never contended.
fn build_cw(profile_dir: &Path) -> PathBuf {
    let target_dir = profile_dir.join("specs-bin");
    let release = profile_dir.ends_with("release");
    let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());

    let mut build = std::process::Command::new(cargo);
    build
        .args(["build", "-p", "cronwarden", "--bin", "cw", "--target-dir"])
        .arg(&target_dir);
    if release {
        build.arg("--release");
    }
    let status = build.status().unwrap();
    assert!(status.success(), "building cw failed: {}", status);

    let profile = if release { "release" } else { "debug" };
    target_dir.join(profile).join(CW_FILE_NAME)
}

/// `cw` with a clean environment.
pub fn cli() -> CliBuilder {
    let mut cmd = assert_cmd::Command::new(cw_binary());
    let inherited = [
        "CW_CONFIG",
        "CW_KUBE_NAMESPACE",
        "CW_LABEL_PREFIX",
        "CW_SUBJECT",
    ];
    for key in inherited {
        cmd.env_remove(key);
    }
    cmd.env("CW_LOG", "warn");
    CliBuilder { cmd }
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    fn run(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        RunAssert { output }
    }

    /// Run and assert exit code 0.
    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstderr:\n{}",
            run.output.status.code(),
            run.stderr()
        );
        run
    }

    /// Run and assert the given exit code.
    pub fn fails_with(self, code: i32) -> RunAssert {
        let run = self.run();
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "stdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout missing {:?}:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr missing {:?}:\n{}",
            expected,
            stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }
}
