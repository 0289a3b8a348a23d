//! Repository backed by a directory tree.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{ArtifactRepository, RepoEntry, join_path};

/// A repository laid out on the filesystem exactly as in Artifactory:
/// `<root>/<repo>/<project>/<app>/<version>/<artifact>.jar`.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self {
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/').filter(|segment| !segment.is_empty()).fold(self.root.clone(), |acc, s| acc.join(s))
    }
}

impl ArtifactRepository for LocalRepository {
    async fn list(&self, path: &str) -> Result<Vec<RepoEntry>> {
        let dir = self.resolve(path);
        let mut reader = fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to list repository directory {}", dir.display()))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .with_context(|| format!("Failed to read repository directory {}", dir.display()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push(RepoEntry::new(join_path(path, &name), is_dir));
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.resolve(path);
        fs::read(&file).await.with_context(|| format!("Failed to read artifact {}", file.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_sorted_with_kinds() {
        let temp = TempDir::new().unwrap();
        let app_dir = temp.path().join("libs").join("app");
        std::fs::create_dir_all(app_dir.join("1.10.0")).unwrap();
        std::fs::create_dir_all(app_dir.join("1.2.0")).unwrap();
        std::fs::write(app_dir.join("maven-metadata.xml"), b"<metadata/>").unwrap();

        let repo = LocalRepository::new(temp.path().to_path_buf());
        let entries = repo.list("libs/app").await.unwrap();

        assert_eq!(
            entries,
            vec![
                RepoEntry::new("libs/app/1.10.0", true),
                RepoEntry::new("libs/app/1.2.0", true),
                RepoEntry::new("libs/app/maven-metadata.xml", false),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let temp = TempDir::new().unwrap();
        let repo = LocalRepository::new(temp.path().to_path_buf());

        let error = repo.list("libs/absent").await.unwrap_err();
        assert!(error.to_string().contains("Failed to list repository directory"));
    }

    #[tokio::test]
    async fn test_fetch() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a")).unwrap();
        std::fs::write(temp.path().join("a").join("app.jar"), b"jar bytes").unwrap();

        let repo = LocalRepository::new(temp.path().to_path_buf());
        assert_eq!(repo.fetch("a/app.jar").await.unwrap(), b"jar bytes");
        assert!(repo.fetch("a/missing.jar").await.is_err());
    }
}
