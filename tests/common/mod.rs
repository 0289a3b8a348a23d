//! Common helpers for release-agent integration tests.

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use release_agent::test_utils::{DeployFixture, init_test_logging};
use release_agent::version::Version;

pub const PROJECT: &str = "rtb";
pub const APP: &str = "data-sync";
pub const REPO_DIR: &str = "libs-snapshot-local/rtb/data-sync";

/// A throwaway deployment: repository tree, install location, scratch base
/// and a configuration file whose service commands append to a log.
pub struct TestProject {
    temp: TempDir,
    fixture: DeployFixture,
    config_path: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        init_test_logging(None);
        let temp = TempDir::new()?;
        let fixture = DeployFixture::new(temp.path(), REPO_DIR, APP);
        fs::create_dir_all(fixture.work_dir())?;
        fs::create_dir_all(fixture.repo_root().join(REPO_DIR))?;

        let config_path = temp.path().join("release-agent.toml");
        let project = Self {
            temp,
            fixture,
            config_path,
        };
        let log = project.service_log();
        project.write_config(
            &format!("echo stop >> '{}'", log.display()),
            &format!("echo start >> '{}'", log.display()),
        )?;
        Ok(project)
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn fixture(&self) -> &DeployFixture {
        &self.fixture
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn service_log(&self) -> PathBuf {
        self.temp.path().join("service.log")
    }

    /// Replace the service commands in the configuration file.
    pub fn write_config(&self, stop: &str, start: &str) -> Result<()> {
        fs::write(&self.config_path, self.fixture.config_toml(stop, start))?;
        Ok(())
    }

    /// Service commands issued so far, one per line.
    pub fn service_calls(&self) -> Vec<String> {
        fs::read_to_string(self.service_log())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn installed_version(&self) -> Version {
        release_agent::installed::InstalledApplication::new(
            self.fixture.install_path(),
            release_agent::constants::DEFAULT_METADATA_ENTRY,
            release_agent::constants::DEFAULT_VERSION_PREFIX,
        )
        .get_version()
    }

    /// `do-release` with this project's configuration and a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("do-release").expect("binary is built");
        cmd.env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env_remove(release_agent::constants::CONFIG_ENV_VAR)
            .arg("--config")
            .arg(&self.config_path);
        cmd
    }
}
