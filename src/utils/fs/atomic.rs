//! Atomic file replacement using a temp-and-rename strategy.
//!
//! The installed artifact is read by a running service. Writing it in place
//! would let a restart race a half-copied JAR, so every write here lands in a
//! sibling temporary file first and is renamed over the target.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::temp::ensure_dir;

/// Sibling path used while replacing `path` (`app.jar` -> `app.jar.tmp`).
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically write `content` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the staging file cannot be created, written, synced or
/// renamed over `path`.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = staging_path(path);

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Atomically replace `dest` with a copy of `src`.
///
/// Permissions of `src` are carried over by the copy. On failure the staging
/// file is removed and `dest` is left untouched.
///
/// # Errors
///
/// Returns an error if `src` cannot be read or `dest` cannot be replaced.
pub fn atomic_copy(src: &Path, dest: &Path) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = staging_path(dest);

    let copied = fs::copy(src, &temp_path).with_context(|| {
        format!("Failed to copy {} to {}", src.display(), temp_path.display())
    });
    let copied = match copied {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    };

    if let Err(e) = fs::rename(&temp_path, dest) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to replace {}", dest.display()));
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_staging_path() {
        assert_eq!(staging_path(Path::new("/opt/app/app.jar")), PathBuf::from("/opt/app/app.jar.tmp"));
    }

    #[test]
    fn test_atomic_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("file.bin");

        atomic_write(&path, b"payload").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"payload");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_atomic_copy_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("new.jar");
        let dest = temp.path().join("installed").join("app.jar");
        fs::write(&src, b"new build").unwrap();
        atomic_write(&dest, b"old build").unwrap();

        let copied = atomic_copy(&src, &dest).unwrap();

        assert_eq!(copied, 9);
        assert_eq!(fs::read(&dest).unwrap(), b"new build");
        assert!(!staging_path(&dest).exists());
    }

    #[test]
    fn test_atomic_copy_missing_source_leaves_dest() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("app.jar");
        fs::write(&dest, b"old build").unwrap();

        assert!(atomic_copy(&temp.path().join("missing.jar"), &dest).is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"old build");
        assert!(!staging_path(&dest).exists());
    }
}
