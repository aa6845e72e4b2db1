//! External packaging tool acquisition.
//!
//! appimagetool resolution order: the fixed local tools directory, then PATH,
//! then a single download to the fixed local path. The download is attempted
//! at most once per run; a failed download aborts the build.

use super::Arch;
use crate::error::{Context, ErrorExt, Result};
use crate::util::{fs, http};
use std::path::{Path, PathBuf};

const APPIMAGETOOL_BASE_URL: &str =
    "https://github.com/AppImage/appimagetool/releases/download/continuous";

/// Local tools directory, relative to the project root.
pub const TOOLS_DIR: &str = "packaging/.tools";

/// Fixed local path for the cached appimagetool binary.
pub fn appimagetool_local_path(project_root: &Path, arch: Arch) -> PathBuf {
    project_root
        .join(TOOLS_DIR)
        .join(format!("appimagetool-{}.AppImage", arch.as_str()))
}

/// Ensures appimagetool is available and returns its path.
///
/// Checks the local tools directory first, then PATH, and downloads to the
/// local tools directory only when both are absent.
pub async fn ensure_appimagetool(project_root: &Path, arch: Arch) -> Result<PathBuf> {
    let local = appimagetool_local_path(project_root, arch);
    if local.is_file() {
        log::debug!("using cached appimagetool at {}", local.display());
        return Ok(local);
    }

    if let Ok(system) = which::which("appimagetool") {
        log::debug!("using system appimagetool at {}", system.display());
        return Ok(system);
    }

    log::info!("appimagetool not found locally or on PATH, downloading");

    let url = format!(
        "{}/appimagetool-{}.AppImage",
        APPIMAGETOOL_BASE_URL,
        arch.as_str()
    );
    let data = http::download(&url).await?;

    let tools_dir = local.parent().context("tools path has no parent")?;
    tokio::fs::create_dir_all(tools_dir)
        .await
        .fs_context("creating tools directory", tools_dir)?;

    tokio::fs::write(&local, data)
        .await
        .fs_context("writing appimagetool", &local)?;
    fs::make_executable(&local).await?;

    Ok(local)
}

/// Resolves the pyinstaller invocation for this project.
///
/// Prefers the project's own virtualenv (`venv/bin/pyinstaller`) over the
/// system binary, matching how the release tooling has always run builds from
/// a venv.
pub fn resolve_pyinstaller(project_root: &Path) -> PathBuf {
    let venv_bin = project_root.join("venv").join("bin").join("pyinstaller");
    if venv_bin.is_file() {
        venv_bin
    } else {
        PathBuf::from("pyinstaller")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_is_fixed_and_arch_specific() {
        let path = appimagetool_local_path(Path::new("/proj"), Arch::X86_64);
        assert_eq!(
            path,
            Path::new("/proj/packaging/.tools/appimagetool-x86_64.AppImage")
        );
    }

    #[tokio::test]
    async fn cached_tool_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let local = appimagetool_local_path(dir.path(), Arch::X86_64);
        tokio::fs::create_dir_all(local.parent().unwrap()).await.unwrap();
        tokio::fs::write(&local, b"#!/bin/sh\n").await.unwrap();

        let resolved = ensure_appimagetool(dir.path(), Arch::X86_64).await.unwrap();
        assert_eq!(resolved, local);
    }

    #[test]
    fn pyinstaller_prefers_project_venv() {
        let dir = tempfile::tempdir().unwrap();
        let venv_bin = dir.path().join("venv/bin");
        std::fs::create_dir_all(&venv_bin).unwrap();
        std::fs::write(venv_bin.join("pyinstaller"), b"#!/bin/sh\n").unwrap();

        assert_eq!(
            resolve_pyinstaller(dir.path()),
            venv_bin.join("pyinstaller")
        );
    }

    #[test]
    fn pyinstaller_falls_back_to_path_lookup() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_pyinstaller(dir.path()), PathBuf::from("pyinstaller"));
    }
}
