//! Constants used across release-agent.
//!
//! Defaults for configuration values live here so the CLI help, the config
//! loader and the tests agree on them.

/// Delay between a failed run and the next attempt (5 minutes).
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 300;

/// HTTP timeout for repository requests.
pub const DEFAULT_REPOSITORY_TIMEOUT_SECS: u64 = 60;

/// Archive entry (matched by suffix) holding the build metadata.
pub const DEFAULT_METADATA_ENTRY: &str = "build-info.properties";

/// Metadata line prefix carrying the build version.
pub const DEFAULT_VERSION_PREFIX: &str = "build.version=";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "RELEASE_AGENT_CONFIG";

/// Directory under the home directory holding the default configuration.
pub const CONFIG_DIR_NAME: &str = ".release-agent";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File extension of deployable artifacts.
pub const ARTIFACT_EXTENSION: &str = ".jar";

/// Classifier suffixes published next to the main artifact that must never be
/// installed.
pub const IGNORED_ARTIFACT_SUFFIXES: [&str; 2] = ["-sources.jar", "-javadoc.jar"];

/// Download attempts per run: the first try plus one retry after stopping the
/// service.
pub const DOWNLOAD_ATTEMPTS: u32 = 2;
