//! The latest published build of an application.
//!
//! A repository directory holds one sub-directory per published version:
//!
//! ```text
//! libs-release-local/rtb/data-sync/
//!   1.9.0/
//!   1.10.0/
//!     data-sync-1.10.0.jar
//!     data-sync-1.10.0-sources.jar
//!   maven-metadata.xml
//! ```
//!
//! [`RemoteArtifact::resolve`] lists that directory once and keeps the
//! sub-directory with the highest normalized version. Files next to the
//! version directories (such as `maven-metadata.xml`) are never candidates.

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::constants::{ARTIFACT_EXTENSION, IGNORED_ARTIFACT_SUFFIXES};
use crate::core::DeployError;
use crate::repository::{ArtifactRepository, RepoEntry, join_path};
use crate::utils::fs::atomic_write;
use crate::version::{Version, VersionedEntity, clean, normalize};

/// The highest published version of one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifact {
    app: String,
    resolved_path: String,
    version_string: String,
    version: Version,
}

impl RemoteArtifact {
    /// List `directory` and pick the sub-directory with the highest version.
    ///
    /// Among directories with equal normalized versions the lexicographically
    /// greatest name wins, whatever order the repository lists them in.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails, or
    /// [`DeployError::NoArtifactsFound`] if the directory has no
    /// sub-directories.
    pub async fn resolve<R>(repo: &R, app: &str, directory: &str) -> Result<Self>
    where
        R: ArtifactRepository + ?Sized,
    {
        let entries = repo.list(directory).await?;
        let best = entries
            .iter()
            .filter(|entry| entry.is_dir)
            .max_by(|a, b| compare_entries(a, b))
            .ok_or_else(|| DeployError::NoArtifactsFound {
                path: directory.to_string(),
            })?;

        let version_string = clean(best.name());
        let version = normalize(&version_string);
        debug!("Resolved {} to {} ({version})", directory, best.path);

        Ok(Self {
            app: app.to_string(),
            resolved_path: best.path.clone(),
            version_string,
            version,
        })
    }

    /// Cleaned name of the resolved entry, e.g. `1.10.0` for `release-1.10.0`.
    #[must_use]
    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    /// Repository path of the resolved version directory.
    #[must_use]
    pub fn resolved_path(&self) -> &str {
        &self.resolved_path
    }

    /// Repository path of the JAR to install.
    ///
    /// The first child JAR of the resolved version (by name) that is not a
    /// sources or javadoc JAR. When the listing has none, the conventional
    /// `<dir>/<app>-<version>.jar` is assumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be listed.
    pub async fn download_location<R>(&self, repo: &R) -> Result<String>
    where
        R: ArtifactRepository + ?Sized,
    {
        let mut children = repo.list(&self.resolved_path).await?;
        children.sort_by(|a, b| a.name().cmp(b.name()));
        if let Some(jar) = children.iter().find(|child| is_installable(child)) {
            return Ok(jar.path.clone());
        }

        let fallback =
            join_path(&self.resolved_path, &format!("{}-{}{ARTIFACT_EXTENSION}", self.app, self.version_string));
        debug!("No artifact listed under {}, assuming {fallback}", self.resolved_path);
        Ok(fallback)
    }

    /// Fetch the artifact and write it to `destination`.
    ///
    /// Returns `Ok(false)` when the repository could not deliver the file, so
    /// the caller can retry after stopping the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be listed or `destination`
    /// cannot be written.
    pub async fn download<R>(&self, repo: &R, destination: &Path) -> Result<bool>
    where
        R: ArtifactRepository + ?Sized,
    {
        let location = self.download_location(repo).await?;
        debug!("Fetching {location}");

        let bytes = match repo.fetch(&location).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Download of {location} failed: {e:#}");
                return Ok(false);
            }
        };

        atomic_write(destination, &bytes)?;
        info!(
            "Downloaded {} bytes to {} ({})",
            bytes.len(),
            destination.display(),
            compute_sha256(&bytes)
        );
        Ok(true)
    }
}

impl VersionedEntity for RemoteArtifact {
    fn version(&self) -> Version {
        self.version.clone()
    }
}

/// Order by normalized version, then by name.
fn compare_entries(a: &RepoEntry, b: &RepoEntry) -> Ordering {
    normalize(&clean(a.name()))
        .cmp(&normalize(&clean(b.name())))
        .then_with(|| a.name().cmp(b.name()))
}

fn is_installable(entry: &RepoEntry) -> bool {
    let name = entry.name();
    !entry.is_dir
        && name.ends_with(ARTIFACT_EXTENSION)
        && !IGNORED_ARTIFACT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// `sha256:<hex>` digest of `bytes`.
#[must_use]
pub fn compute_sha256(bytes: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(bytes)))
}
