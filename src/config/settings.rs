//! The release-agent configuration file.
//!
//! One TOML file describes where artifacts are published, where the
//! application is installed, how its service is controlled and how long to
//! wait between failed runs. A missing file is not an error: the defaults
//! describe an Artifactory-style repository and a systemd service.
//!
//! # Location
//!
//! 1. `--config <PATH>` on the command line
//! 2. `RELEASE_AGENT_CONFIG` environment variable
//! 3. `~/.release-agent/config.toml`
//!
//! # File Format
//!
//! ```toml
//! [repository]
//! url = "https://artifactory.example.com/artifactory"
//! path = "libs-{{ channel }}-local/{{ project }}/{{ app }}"
//! api_key = "AKCp..."
//! timeout_secs = 60
//!
//! [install]
//! path = "/opt/{{ app }}/{{ app }}.jar"
//! metadata_entry = "build-info.properties"
//! version_prefix = "build.version="
//!
//! [service]
//! stop = "systemctl stop {{ app }}"
//! start = "systemctl start {{ app }}"
//!
//! [retry]
//! delay_secs = 300
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use super::template::{TemplateVars, render};
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_METADATA_ENTRY,
    DEFAULT_REPOSITORY_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_SECS, DEFAULT_VERSION_PREFIX,
};

/// Complete configuration for one release-agent installation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployConfig {
    #[serde(default)]
    pub repository: RepositorySettings,

    #[serde(default)]
    pub install: InstallSettings,

    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

/// Where published artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositorySettings {
    /// Repository base URL. `http(s)://` selects the Artifactory client,
    /// `file://` or a plain path selects a local directory tree.
    #[serde(default = "default_repository_url")]
    pub url: String,

    /// Directory holding one sub-directory per published version.
    #[serde(default = "default_repository_path")]
    pub path: String,

    /// Artifactory API key, sent as `X-JFrog-Art-Api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_repository_timeout")]
    pub timeout_secs: u64,
}

impl RepositorySettings {
    /// Per-request HTTP timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            url: default_repository_url(),
            path: default_repository_path(),
            api_key: None,
            timeout_secs: default_repository_timeout(),
        }
    }
}

/// Where and how the application is installed locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallSettings {
    /// Path of the installed JAR.
    #[serde(default = "default_install_path")]
    pub path: String,

    /// Base directory for per-run scratch directories. Defaults to the
    /// system temporary directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    /// Archive entry holding the build metadata, matched by suffix.
    #[serde(default = "default_metadata_entry")]
    pub metadata_entry: String,

    /// Line prefix carrying the version inside the metadata entry.
    #[serde(default = "default_version_prefix")]
    pub version_prefix: String,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            path: default_install_path(),
            work_dir: None,
            metadata_entry: default_metadata_entry(),
            version_prefix: default_version_prefix(),
        }
    }
}

/// Shell commands controlling the application's service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSettings {
    #[serde(default = "default_stop_command")]
    pub stop: String,

    #[serde(default = "default_start_command")]
    pub start: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            stop: default_stop_command(),
            start: default_start_command(),
        }
    }
}

/// Outer retry loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrySettings {
    /// Seconds to wait after a failed run before starting over.
    #[serde(default = "default_retry_delay")]
    pub delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            delay_secs: default_retry_delay(),
        }
    }
}

fn default_repository_url() -> String {
    "http://localhost:8081/artifactory".to_string()
}

fn default_repository_path() -> String {
    "libs-{{ channel }}-local/{{ project }}/{{ app }}".to_string()
}

fn default_repository_timeout() -> u64 {
    DEFAULT_REPOSITORY_TIMEOUT_SECS
}

fn default_install_path() -> String {
    "/opt/{{ app }}/{{ app }}.jar".to_string()
}

fn default_metadata_entry() -> String {
    DEFAULT_METADATA_ENTRY.to_string()
}

fn default_version_prefix() -> String {
    DEFAULT_VERSION_PREFIX.to_string()
}

fn default_stop_command() -> String {
    "systemctl stop {{ app }}".to_string()
}

fn default_start_command() -> String {
    "systemctl start {{ app }}".to_string()
}

fn default_retry_delay() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

impl DeployConfig {
    /// Load from `path` if given, else from the default location.
    ///
    /// A configuration file that does not exist yields [`DeployConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))
    }

    /// `RELEASE_AGENT_CONFIG` if set, otherwise `~/.release-agent/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Repository directory listing every published version of one app.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not render.
    pub fn repository_path(&self, vars: &TemplateVars<'_>) -> Result<String> {
        let rendered = render(&self.repository.path, vars)?;
        Ok(rendered.trim_matches('/').to_string())
    }

    /// Local path of the installed artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not render.
    pub fn install_path(&self, vars: &TemplateVars<'_>) -> Result<PathBuf> {
        render(&self.install.path, vars).map(PathBuf::from)
    }

    /// Base directory for scratch space.
    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.install.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry.delay_secs)
    }
}
