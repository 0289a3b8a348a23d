//! The release decision and the install sequence.
//!
//! One [`ReleaseOrchestrator::run`] performs a single pass:
//!
//! 1. Resolve the latest published artifact and look at the installed one.
//! 2. If their versions match and the release is not forced, do nothing.
//! 3. Otherwise download into a fresh scratch directory. If the download
//!    fails, stop the service (it may hold the artifact or the bandwidth) and
//!    try once more. A second failure aborts the run.
//! 4. Replace the installed JAR and bring the service back up. Its exit
//!    status is the outcome of the run.
//!
//! Retrying failed runs is the caller's job (see [`crate::cli`]).

use anyhow::{Result, bail};
use clap::ValueEnum;
use std::fmt;
use tracing::{info, warn};

use crate::config::{DeployConfig, TemplateVars};
use crate::constants::{ARTIFACT_EXTENSION, DOWNLOAD_ATTEMPTS};
use crate::core::DeployError;
use crate::installed::InstalledApplication;
use crate::remote::RemoteArtifact;
use crate::repository::ArtifactRepository;
use crate::service::ServiceControl;
use crate::utils::fs::{ScratchDir, atomic_copy};
use crate::version::{Version, VersionedEntity, differs};

/// Which repository line a release comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Channel {
    Release,
    Snapshot,
}

impl Channel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub project: String,
    pub channel: Channel,
    pub app: String,
    /// Install even when the versions already match.
    pub force: bool,
}

impl ReleaseRequest {
    #[must_use]
    pub fn new(project: impl Into<String>, channel: Channel, app: impl Into<String>, force: bool) -> Self {
        Self {
            project: project.into(),
            channel,
            app: app.into(),
            force,
        }
    }

    #[must_use]
    pub fn template_vars(&self) -> TemplateVars<'_> {
        TemplateVars::new(&self.project, self.channel.as_str(), &self.app)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Installed and published versions match.
    UpToDate {
        version: Version,
    },
    /// A new artifact was installed and the service restarted.
    Released {
        version: Version,
        exit_code: i32,
    },
}

impl ReleaseOutcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::UpToDate {
                ..
            } => 0,
            Self::Released {
                exit_code,
                ..
            } => *exit_code,
        }
    }
}

/// Drives one release pass against a repository and a service.
#[derive(Debug)]
pub struct ReleaseOrchestrator<R, S> {
    repository: R,
    service: S,
    config: DeployConfig,
}

impl<R, S> ReleaseOrchestrator<R, S>
where
    R: ArtifactRepository,
    S: ServiceControl,
{
    pub const fn new(repository: R, service: S, config: DeployConfig) -> Self {
        Self {
            repository,
            service,
            config,
        }
    }

    pub const fn repository(&self) -> &R {
        &self.repository
    }

    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Compare versions and release if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be listed, the artifact
    /// cannot be downloaded after stopping the service, the installed file
    /// cannot be replaced, or a service command cannot be launched.
    pub async fn run(&self, request: &ReleaseRequest) -> Result<ReleaseOutcome> {
        let vars = request.template_vars();
        info!("Project: {}, type: {}, app: {}", request.project, request.channel, request.app);

        let directory = self.config.repository_path(&vars)?;
        let remote = RemoteArtifact::resolve(&self.repository, &request.app, &directory).await?;
        let installed =
            InstalledApplication::from_settings(self.config.install_path(&vars)?, &self.config.install);

        let remote_version = remote.version();
        let installed_version = installed.version();
        info!("Artifact version: {remote_version}, installed version: {installed_version}");

        if !differs(&remote, Some(&installed_version)) {
            if !request.force {
                info!("{} {installed_version} is up to date, do nothing", request.app);
                return Ok(ReleaseOutcome::UpToDate {
                    version: installed_version,
                });
            }
            info!("Forcing release of {} {remote_version}", request.app);
        }

        let exit_code = self.release(request, &remote, &installed).await?;
        Ok(ReleaseOutcome::Released {
            version: remote_version,
            exit_code,
        })
    }

    async fn release(
        &self,
        request: &ReleaseRequest,
        remote: &RemoteArtifact,
        installed: &InstalledApplication,
    ) -> Result<i32> {
        let scratch = ScratchDir::new_in(&self.config.work_dir(), &request.app)?;
        let downloaded = scratch.path().join(format!("{}{ARTIFACT_EXTENSION}", request.app));

        info!("Downloading {} {}", request.app, remote.version_string());
        let mut service_stopped = false;
        if !remote.download(&self.repository, &downloaded).await? {
            warn!("Download failed, stopping {} and retrying", request.app);
            let status = self.service.stop().await?;
            if status != 0 {
                warn!("Stop command exited with status {status}");
            }
            service_stopped = true;

            if !remote.download(&self.repository, &downloaded).await? {
                bail!(DeployError::DownloadFailed {
                    app: request.app.clone(),
                    attempts: DOWNLOAD_ATTEMPTS,
                });
            }
        }

        info!("Doing release of {} {} to {}", request.app, remote.version(), installed.path().display());
        atomic_copy(&downloaded, installed.path())?;

        let exit_code = if service_stopped {
            self.service.start().await?
        } else {
            self.service.restart().await?
        };
        info!("Service for {} exited with status {exit_code}", request.app);
        Ok(exit_code)
    }
}
