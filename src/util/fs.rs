//! File system utilities for packaging.
//!
//! Safe file operations with automatic parent-directory creation, idempotent
//! clean-up, and symlink preservation for staged bundles.

use crate::error::{ErrorExt, ReleaseError, Result};
use std::io;
use std::path::Path;
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(ReleaseError::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Removes the file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(ReleaseError::Fs {
            context: "removing file",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(ReleaseError::Generic(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(ReleaseError::Generic(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating destination directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", to)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks. Fails if the source path is not a directory or
/// doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(ReleaseError::Generic(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(ReleaseError::Generic(format!("{from:?} is not a directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // walkdir iteration is blocking; run it on the blocking pool
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry.map_err(|e| ReleaseError::Generic(e.to_string()))?;
            let rel_path = entry
                .path()
                .strip_prefix(&from)
                .map_err(|e| ReleaseError::Generic(e.to_string()))?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                #[cfg(unix)]
                std::os::unix::fs::symlink(&target, &dest_path)?;
                #[cfg(not(unix))]
                let _ = target;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| ReleaseError::Generic(format!("directory copy task panicked: {e}")))?
}

/// Marks a file as executable (0o755).
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .fs_context("setting executable permissions", path)
}

/// Marks a file as executable. No-op outside Unix.
#[cfg(not(unix))]
pub async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Renders a one-line-per-entry listing of a directory's contents.
///
/// Used in error messages when an expected artifact is absent, so the failure
/// report shows what the build actually produced.
pub fn listing(dir: &Path) -> String {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let items: Vec<_> = entries
                .flatten()
                .map(|e| {
                    let path = e.path();
                    let name = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("<unknown>")
                        .to_string();
                    if path.is_dir() {
                        format!("  [DIR]  {name}")
                    } else {
                        let size = path.metadata().map(|m| m.len()).unwrap_or(0);
                        format!("  [FILE] {name} ({size} bytes)")
                    }
                })
                .collect();
            if items.is_empty() {
                "  (empty)".to_string()
            } else {
                items.join("\n")
            }
        }
        Err(e) => format!("  [cannot read directory: {e}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing");
        remove_dir_all(&target).await.unwrap();
        remove_dir_all(&target).await.unwrap();
    }

    #[tokio::test]
    async fn remove_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("stale.exe");
        tokio::fs::write(&target, b"mz").await.unwrap();

        remove_file(&target).await.unwrap();
        assert!(!target.exists());
        remove_file(&target).await.unwrap();
    }

    #[tokio::test]
    async fn create_dir_all_with_erase_clears_prior_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("build");
        tokio::fs::create_dir_all(&target).await.unwrap();
        tokio::fs::write(target.join("stale"), b"x").await.unwrap();

        create_dir_all(&target, true).await.unwrap();
        assert!(target.exists());
        assert!(!target.join("stale").exists());

        // Second run succeeds as well
        create_dir_all(&target, true).await.unwrap();
    }

    #[tokio::test]
    async fn copy_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        tokio::fs::write(&src, b"payload").await.unwrap();

        let dst = dir.path().join("nested/deep/b.txt");
        copy_file(&src, &dst).await.unwrap();
        assert_eq!(tokio::fs::read(&dst).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn copy_dir_copies_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bundle");
        tokio::fs::create_dir_all(src.join("sub")).await.unwrap();
        tokio::fs::write(src.join("bin"), b"exe").await.unwrap();
        tokio::fs::write(src.join("sub/lib"), b"so").await.unwrap();

        let dst = dir.path().join("staged/bundle");
        copy_dir(&src, &dst).await.unwrap();
        assert_eq!(tokio::fs::read(dst.join("bin")).await.unwrap(), b"exe");
        assert_eq!(tokio::fs::read(dst.join("sub/lib")).await.unwrap(), b"so");
    }

    #[test]
    fn listing_reports_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.exe"), b"mz").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let text = listing(dir.path());
        assert!(text.contains("[FILE] a.exe"));
        assert!(text.contains("[DIR]  sub"));
    }
}
