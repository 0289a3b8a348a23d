//! Helpers shared by unit and integration tests.
//!
//! Available with `cfg(test)` or the `test-utils` feature.

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use zip::write::SimpleFileOptions;

use crate::constants::{DEFAULT_METADATA_ENTRY, DEFAULT_VERSION_PREFIX};

static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests, once per process.
///
/// With `level` unset logging stays off unless `RUST_LOG` is set:
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// JAR bytes whose build metadata declares `version`.
///
/// # Errors
///
/// Returns an error if the archive cannot be assembled.
pub fn jar_bytes(version: &str) -> Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer.start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())?;
    writer.write_all(b"Manifest-Version: 1.0\n")?;
    writer.start_file(format!("BOOT-INF/classes/{DEFAULT_METADATA_ENTRY}"), SimpleFileOptions::default())?;
    writer.write_all(format!("build.name=test\n{DEFAULT_VERSION_PREFIX}{version}\n").as_bytes())?;
    Ok(writer.finish()?.into_inner())
}

/// A repository tree plus an install location under one root directory.
#[derive(Debug, Clone)]
pub struct DeployFixture {
    root: PathBuf,
    repo_dir: String,
    app: String,
}

impl DeployFixture {
    /// `repo_dir` is the rendered repository path, e.g.
    /// `libs-release-local/rtb/data-sync`.
    pub fn new(root: &Path, repo_dir: &str, app: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            repo_dir: repo_dir.to_string(),
            app: app.to_string(),
        }
    }

    pub fn repo_root(&self) -> PathBuf {
        self.root.join("repo")
    }

    pub fn install_path(&self) -> PathBuf {
        self.root.join("opt").join(format!("{}.jar", self.app))
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join("work")
    }

    /// Publish `<version>/<app>-<version>.jar` into the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be written.
    pub fn publish(&self, version: &str) -> Result<PathBuf> {
        let dir = self.repo_root().join(&self.repo_dir).join(version);
        std::fs::create_dir_all(&dir)?;
        let jar = dir.join(format!("{}-{version}.jar", self.app));
        std::fs::write(&jar, jar_bytes(version)?)?;
        Ok(jar)
    }

    /// Put a JAR declaring `version` at the install path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn install(&self, version: &str) -> Result<()> {
        let path = self.install_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, jar_bytes(version)?)?;
        Ok(())
    }

    /// TOML configuration pointing at this fixture, with the given service
    /// commands.
    pub fn config_toml(&self, stop: &str, start: &str) -> String {
        format!(
            "[repository]\nurl = {url:?}\n\n[install]\npath = {install:?}\nwork_dir = {work:?}\n\n[service]\nstop = {stop:?}\nstart = {start:?}\n\n[retry]\ndelay_secs = 0\n",
            url = format!("file://{}", self.repo_root().display()),
            install = self.install_path().display().to_string(),
            work = self.work_dir().display().to_string(),
        )
    }

    /// Number of entries left in the scratch base directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn scratch_entries(&self) -> Result<usize> {
        if !self.work_dir().exists() {
            return Ok(0);
        }
        Ok(std::fs::read_dir(self.work_dir())?.count())
    }
}
