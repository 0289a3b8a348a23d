//! Access to the binary repository holding published artifacts.
//!
//! The release flow needs two things from a repository: the children of a
//! directory and the bytes of a file. [`ArtifactRepository`] names exactly
//! those, and two backends implement it:
//!
//! - [`HttpRepository`] - an Artifactory instance, listed through its storage
//!   API and downloaded with plain GETs
//! - [`LocalRepository`] - the same layout on a local or mounted filesystem
//!
//! [`AnyRepository`] picks the backend from the configured URL.
//!
//! Paths are always relative to the repository root and `/`-separated, for
//! example `libs-release-local/rtb/data-sync/1.4.0`.

mod http;
mod local;

pub use http::HttpRepository;
pub use local::LocalRepository;

use anyhow::Result;
use std::future::Future;
use std::path::PathBuf;

use crate::config::RepositorySettings;

/// One child of a listed repository directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// Full repository path of the entry.
    pub path: String,
    pub is_dir: bool,
}

impl RepoEntry {
    #[must_use]
    pub fn new(path: impl Into<String>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    /// Last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// Join a repository directory and a child name.
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if dir.is_empty() { name.to_string() } else { format!("{dir}/{name}") }
}

/// A source of published artifacts.
pub trait ArtifactRepository: Send + Sync {
    /// List the direct children of `path`.
    fn list(&self, path: &str) -> impl Future<Output = Result<Vec<RepoEntry>>> + Send;

    /// Read the whole file at `path`.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// The repository backend selected by configuration.
#[derive(Debug, Clone)]
pub enum AnyRepository {
    Http(HttpRepository),
    Local(LocalRepository),
}

impl AnyRepository {
    /// `http://` and `https://` URLs select Artifactory; `file://` URLs and
    /// plain paths select a local directory tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: &RepositorySettings) -> Result<Self> {
        let url = settings.url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            let repo = HttpRepository::new(url, settings.api_key.clone(), settings.timeout())?;
            return Ok(Self::Http(repo));
        }

        let root = url.strip_prefix("file://").unwrap_or(url);
        Ok(Self::Local(LocalRepository::new(PathBuf::from(root))))
    }
}

impl ArtifactRepository for AnyRepository {
    async fn list(&self, path: &str) -> Result<Vec<RepoEntry>> {
        match self {
            Self::Http(repo) => repo.list(path).await,
            Self::Local(repo) => repo.list(path).await,
        }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        match self {
            Self::Http(repo) => repo.fetch(path).await,
            Self::Local(repo) => repo.fetch(path).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name() {
        assert_eq!(RepoEntry::new("libs/rtb/app/1.2.3", true).name(), "1.2.3");
        assert_eq!(RepoEntry::new("libs/rtb/app/1.2.3/", true).name(), "1.2.3");
        assert_eq!(RepoEntry::new("app-1.0.jar", false).name(), "app-1.0.jar");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("libs/rtb", "app"), "libs/rtb/app");
        assert_eq!(join_path("libs/rtb/", "/app"), "libs/rtb/app");
        assert_eq!(join_path("", "app"), "app");
    }

    #[test]
    fn test_backend_selection() {
        let mut settings = RepositorySettings::default();

        settings.url = "https://repo.example.com/artifactory".to_string();
        assert!(matches!(AnyRepository::from_settings(&settings).unwrap(), AnyRepository::Http(_)));

        settings.url = "file:///srv/repo".to_string();
        match AnyRepository::from_settings(&settings).unwrap() {
            AnyRepository::Local(repo) => assert_eq!(repo.root(), std::path::Path::new("/srv/repo")),
            AnyRepository::Http(_) => panic!("expected local backend"),
        }

        settings.url = "/srv/repo".to_string();
        assert!(matches!(AnyRepository::from_settings(&settings).unwrap(), AnyRepository::Local(_)));
    }
}
