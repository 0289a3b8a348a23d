//! Scratch directories with RAII cleanup.
//!
//! Each run downloads into its own directory so concurrent runs for different
//! applications (or a leftover from a crashed run) never share files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create `path` and its parents if missing.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or `path` exists but
/// is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// A per-run directory that is removed when dropped.
///
/// The directory name is `{prefix}_{uuid}` under the chosen base, so two
/// scratch directories never collide even with the same prefix.
///
/// ```rust,no_run
/// use release_agent::utils::fs::ScratchDir;
///
/// # fn example() -> anyhow::Result<()> {
/// let scratch = ScratchDir::new_in(&std::env::temp_dir(), "data-sync")?;
/// std::fs::write(scratch.path().join("data-sync.jar"), b"...")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh scratch directory under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new_in(base: &Path, prefix: &str) -> Result<Self> {
        let path = base.join(format!("{prefix}_{}", uuid::Uuid::new_v4()));
        ensure_dir(&path)?;
        debug!("Created scratch directory {}", path.display());

        Ok(Self {
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let base = TempDir::new().unwrap();
        let path = {
            let scratch = ScratchDir::new_in(base.path(), "data-sync").unwrap();
            fs::write(scratch.path().join("file.jar"), b"x").unwrap();
            assert!(scratch.path().is_dir());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_dirs_are_unique() {
        let base = TempDir::new().unwrap();
        let first = ScratchDir::new_in(base.path(), "app").unwrap();
        let second = ScratchDir::new_in(base.path(), "app").unwrap();

        assert_ne!(first.path(), second.path());
        let name = first.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("app_"));
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let base = TempDir::new().unwrap();
        let file = base.path().join("file");
        fs::write(&file, b"x").unwrap();

        assert!(ensure_dir(&file).is_err());
        ensure_dir(&base.path().join("a").join("b")).unwrap();
        assert!(base.path().join("a").join("b").is_dir());
    }
}
