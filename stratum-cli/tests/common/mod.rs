//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builders isolated from the user's own settings
//! - A small configuration project fixture

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables read by the CLI or the settings layer.
const STRATUM_ENV_VARS: [&str; 11] = [
    "STRATUM_SETTINGS",
    "STRATUM_SETTINGS_DIR",
    "STRATUM_OUTPUT_FORMAT",
    "STRATUM_LOG_MODE",
    "STRATUM_ON_NOT_FOUND",
    "STRATUM_PROFILES_ACTIVE",
    "STRATUM_PROFILES_DEFAULT",
    "STRATUM_PROFILES_ADDITIONAL",
    "STRATUM_BASE_DIR",
    "STRATUM_RESOURCE_ROOTS",
    "STRATUM_IMPORTS",
];

/// Test environment with an isolated project and user settings directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory, used as the working directory
    pub temp_path: PathBuf,
    /// Path to the user settings directory
    pub settings_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new, empty test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let settings_dir = temp_path.join(".stratum-user");

        Self {
            temp_dir,
            temp_path,
            settings_dir,
        }
    }

    /// Create an environment holding a small configuration project.
    ///
    /// - `stratum.yaml` anchors relative locations to the project and
    ///   imports `app.yml`
    /// - `app.yml` sets `app.name`, a placeholder greeting and a server list,
    ///   and has an `eu`-gated document
    /// - `app-prod.yml` overrides `app.name`
    pub fn with_project() -> Self {
        let env = Self::new();
        env.write("stratum.yaml", "base_dir: .\nimports: [app.yml]\n");
        env.write(
            "app.yml",
            "app:\n  name: demo\n  greeting: hello ${app.name}\nservers:\n  - alpha\n  - beta\n---\nconfig:\n  activate:\n    on-profile: eu\napp:\n  region: eu-west\n",
        );
        env.write("app-prod.yml", "app:\n  name: demo-prod\n");
        env
    }

    /// Get a bare command builder.
    ///
    /// Runs in the project directory with every `STRATUM_*` variable cleared,
    /// but without `--settings-dir`.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("stratum").expect("Failed to find stratum binary");
        cmd.current_dir(&self.temp_path);
        for var in STRATUM_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder isolated from the real user settings.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--settings-dir").arg(&self.settings_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file relative to the project directory.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create test directory");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Run `stratum get` and return the trimmed output.
    ///
    /// # Panics
    /// Panics if the command fails.
    pub fn get(&self, key: &str, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .arg("get")
            .arg(key)
            .output()
            .expect("Failed to run get command");

        assert!(
            output.status.success(),
            "Get failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim_end()
            .to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
