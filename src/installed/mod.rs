//! The application currently deployed on this host.
//!
//! The deployed JAR carries a small properties file (by default
//! `build-info.properties`) written at build time. Its `build.version=` line is
//! the only source of truth for what is installed; the file name of the JAR is
//! never consulted.
//!
//! The version is read again on every call. Nothing is cached, so a lookup
//! after an install sees the new artifact.

use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::InstallSettings;
use crate::version::{Version, VersionedEntity, parse_raw};

/// A JAR on local disk and how to find its version inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApplication {
    path: PathBuf,
    metadata_entry: String,
    version_prefix: String,
}

impl InstalledApplication {
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        metadata_entry: impl Into<String>,
        version_prefix: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            metadata_entry: metadata_entry.into(),
            version_prefix: version_prefix.into(),
        }
    }

    /// Build from the `[install]` settings and an already rendered path.
    #[must_use]
    pub fn from_settings(path: PathBuf, settings: &InstallSettings) -> Self {
        Self::new(path, settings.metadata_entry.clone(), settings.version_prefix.clone())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The installed version, or `None` when it cannot be determined.
    ///
    /// A missing file, an archive without the metadata entry, or a metadata
    /// entry without the version line are all `None`.
    #[must_use]
    pub fn try_get_version(&self) -> Option<Version> {
        match self.read_version() {
            Ok(version) => Some(version),
            Err(e) => {
                debug!("No installed version for {}: {e:#}", self.path.display());
                None
            }
        }
    }

    /// The installed version, `0.0.0` when unknown.
    #[must_use]
    pub fn get_version(&self) -> Version {
        self.try_get_version().unwrap_or_default()
    }

    fn read_version(&self) -> Result<Version> {
        let metadata = self.read_metadata()?;
        version_from_metadata(&metadata, &self.version_prefix).ok_or_else(|| {
            anyhow!("'{}' has no line starting with '{}'", self.metadata_entry, self.version_prefix)
        })
    }

    /// Contents of the first archive entry whose name ends with the
    /// configured metadata file name.
    fn read_metadata(&self) -> Result<String> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .with_context(|| format!("{} is not a valid archive", self.path.display()))?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if !entry.name().ends_with(&self.metadata_entry) {
                continue;
            }

            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .with_context(|| format!("Failed to read archive entry {}", entry.name()))?;
            return Ok(content);
        }

        Err(anyhow!("{} has no entry named '{}'", self.path.display(), self.metadata_entry))
    }
}

impl VersionedEntity for InstalledApplication {
    fn version(&self) -> Version {
        self.get_version()
    }
}

/// Version from the first line of `metadata` starting with `prefix`.
///
/// The value is trimmed, cleaned and normalized like every other raw version.
#[must_use]
pub fn version_from_metadata(metadata: &str, prefix: &str) -> Option<Version> {
    metadata
        .lines()
        .find_map(|line| line.strip_prefix(prefix))
        .map(parse_raw)
}
