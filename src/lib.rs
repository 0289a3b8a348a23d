//! release-agent - keep one deployed application at its latest published build.
//!
//! Given a project, a channel (`release` or `snapshot`) and an application
//! name, `do-release` compares the version embedded in the installed JAR with
//! the highest version published in a binary repository. When they differ (or
//! the release is forced) it downloads the published JAR, stops the service,
//! replaces the installed file and starts the service again.
//!
//! # Modules
//!
//! - [`version`] - version cleaning, normalization and comparison
//! - [`installed`] - reading the version out of the deployed JAR
//! - [`repository`] - Artifactory and local-directory backends
//! - [`remote`] - resolving and downloading the latest published build
//! - [`service`] - stopping and starting the application's service
//! - [`release`] - the decide-and-apply sequence
//! - [`cli`] - argument parsing, logging setup and the retry loop
//! - [`config`] - the TOML configuration file
//! - [`core`] - error types and operator-facing error rendering
//! - [`utils`] - atomic file replacement, scratch directories, retry helper
//!
//! # Example
//!
//! ```rust,no_run
//! use release_agent::config::DeployConfig;
//! use release_agent::release::{Channel, ReleaseOrchestrator, ReleaseRequest};
//! use release_agent::repository::AnyRepository;
//! use release_agent::service::ShellServiceControl;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let request = ReleaseRequest::new("rtb", Channel::Snapshot, "data-sync", false);
//! let config = DeployConfig::load_with_optional(None).await?;
//! let repository = AnyRepository::from_settings(&config.repository)?;
//! let service = ShellServiceControl::from_settings(&config.service, &request.template_vars())?;
//!
//! let outcome = ReleaseOrchestrator::new(repository, service, config).run(&request).await?;
//! println!("exit status {}", outcome.exit_code());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installed;
pub mod release;
pub mod remote;
pub mod repository;
pub mod service;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
