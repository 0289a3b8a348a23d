//! Artifactory over HTTP.
//!
//! Directories are listed through the storage API
//! (`GET {base}/api/storage/{path}`), whose JSON response carries a
//! `children` array of `{ "uri": "/1.2.3", "folder": true }` objects. Files are
//! downloaded with `GET {base}/{path}`.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ArtifactRepository, RepoEntry, join_path};
use crate::core::DeployError;

const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

#[derive(Debug, Deserialize)]
struct StorageListing {
    #[serde(default)]
    children: Vec<StorageChild>,
}

#[derive(Debug, Deserialize)]
struct StorageChild {
    uri: String,
    #[serde(default)]
    folder: bool,
}

/// Client for one Artifactory base URL.
#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRepository {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("release-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/api/storage/{}", self.base_url, path.trim_matches('/'))
    }

    fn download_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    async fn get(&self, path: &str, url: &str) -> Result<reqwest::Response, DeployError> {
        debug!("GET {url}");
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        request.send().await.and_then(reqwest::Response::error_for_status).map_err(|e| {
            DeployError::RepositoryRequest {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

/// Turn a storage API listing into entries under `path`.
fn entries_from_listing(path: &str, listing: StorageListing) -> Vec<RepoEntry> {
    listing
        .children
        .into_iter()
        .map(|child| RepoEntry::new(join_path(path, &child.uri), child.folder))
        .collect()
}

impl ArtifactRepository for HttpRepository {
    async fn list(&self, path: &str) -> Result<Vec<RepoEntry>> {
        let url = self.storage_url(path);
        let response = self.get(path, &url).await?;

        let listing: StorageListing =
            response.json().await.map_err(|e| DeployError::RepositoryRequest {
                path: path.to_string(),
                reason: format!("invalid storage listing: {e}"),
            })?;

        Ok(entries_from_listing(path, listing))
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.download_url(path);
        let response = self.get(path, &url).await?;

        let bytes = response.bytes().await.map_err(|e| DeployError::RepositoryRequest {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}
