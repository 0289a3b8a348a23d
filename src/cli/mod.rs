//! Command-line interface for `do-release`.
//!
//! ```text
//! do-release [OPTIONS] <project_name> <release|snapshot> <app_name> [force]
//! ```
//!
//! A run that fails for any reason other than bad arguments is logged and
//! started over from configuration loading after the retry delay. By default
//! this never gives up, which suits a cron job or a systemd timer that must
//! eventually converge; `--max-attempts` bounds it.
//!
//! Exit status is 0 when nothing needed doing, 1 on a usage error or when the
//! attempts are exhausted, and otherwise the status of the service start.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::DeployConfig;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_RETRY_DELAY_SECS};
use crate::release::{Channel, ReleaseOrchestrator, ReleaseOutcome, ReleaseRequest};
use crate::repository::AnyRepository;
use crate::service::ShellServiceControl;
use crate::utils::retry_with_delay;


/// The only accepted fourth positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForceFlag {
    Force,
}

/// Check a binary repository for a newer build and redeploy it.
#[derive(Parser, Debug)]
#[command(
    name = "do-release",
    about = "Install the latest published build of an application and restart its service",
    version,
    long_about = None
)]
pub struct Cli {
    /// Project the application belongs to (e.g. `rtb`)
    project_name: String,

    /// Repository line to release from
    #[arg(value_enum)]
    channel: Channel,

    /// Application to release (e.g. `data-sync`)
    app_name: String,

    /// Install even when the installed version is already current
    #[arg(value_enum)]
    force: Option<ForceFlag>,

    /// Path to the configuration file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Seconds to wait after a failed run (overrides `[retry] delay_secs`)
    #[arg(long, value_name = "SECS")]
    retry_delay: Option<u64>,

    /// Give up after this many failed runs instead of retrying forever
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,
}

/// Settings derived from the command line before any run starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    pub config_path: Option<PathBuf>,
    pub retry_delay: Option<Duration>,
    pub max_attempts: Option<u32>,
}

impl Cli {
    /// The release this invocation asks for.
    #[must_use]
    pub fn request(&self) -> ReleaseRequest {
        ReleaseRequest::new(
            self.project_name.clone(),
            self.channel,
            self.app_name.clone(),
            self.force.is_some(),
        )
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            retry_delay: self.retry_delay.map(Duration::from_secs),
            max_attempts: self.max_attempts,
        }
    }

    /// Initialize logging and run until a pass succeeds.
    ///
    /// Returns the process exit status.
    ///
    /// # Errors
    ///
    /// Returns the last failure once `--max-attempts` runs have failed.
    pub async fn execute(self) -> Result<i32> {
        let config = self.build_config();
        init_logging(&config.log_level);
        self.execute_with_config(config).await
    }

    /// Run with already derived settings. Logging is left as it is.
    ///
    /// # Errors
    ///
    /// Returns the last failure once `max_attempts` runs have failed.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<i32> {
        let request = self.request();
        let delay = retry_delay(&config).await;
        debug!("Retry delay {}s, max attempts {:?}", delay.as_secs(), config.max_attempts);

        let config_path = config.config_path.clone();
        let outcome = retry_with_delay(delay, config.max_attempts, |attempt| {
            let config_path = config_path.clone();
            let request = &request;
            async move {
                debug!("Starting run {attempt}");
                run_once(config_path, request).await
            }
        })
        .await?;

        Ok(outcome.exit_code())
    }
}

/// One full pass: load configuration, build the collaborators and release.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the release fails.
pub async fn run_once(config_path: Option<PathBuf>, request: &ReleaseRequest) -> Result<ReleaseOutcome> {
    let config = DeployConfig::load_with_optional(config_path).await?;
    let repository = AnyRepository::from_settings(&config.repository)?;
    let service = ShellServiceControl::from_settings(&config.service, &request.template_vars())?;

    ReleaseOrchestrator::new(repository, service, config).run(request).await
}

/// `--retry-delay` if given, else the configured delay, else the default.
async fn retry_delay(config: &CliConfig) -> Duration {
    if let Some(delay) = config.retry_delay {
        return delay;
    }

    match DeployConfig::load_with_optional(config.config_path.clone()).await {
        Ok(deploy_config) => deploy_config.retry_delay(),
        Err(e) => {
            debug!("Using default retry delay: {e:#}");
            Duration::from_secs(DEFAULT_RETRY_DELAY_SECS)
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// The usage summary printed for invalid arguments.
#[must_use]
pub fn usage_text(program: &str) -> String {
    format!(
        "Usage: {program} <project_name> <release|snapshot> <app_name> [force]\n\
         Example: {program} rtb snapshot data-sync\n\
         Example: {program} rtb release bundle-distance force\n"
    )
}

/// Name the binary was invoked as, without its directory.
#[must_use]
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .map(PathBuf::from)
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().to_string()))
        .unwrap_or_else(|| "do-release".to_string())
}
