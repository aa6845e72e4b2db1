//! Windows packager - single-file executable cross-built in a container.
//!
//! No Windows host is involved: the manifest's container image carries a
//! Wine/PyInstaller toolchain, installs the project's Python dependencies,
//! and runs PyInstaller against the same bundler spec. The engine check comes
//! first so a host without docker or podman fails before any file is touched.

use super::BuildConfig;
use crate::cli::OutputManager;
use crate::container::{ContainerEngine, ContainerRunner};
use crate::error::{ReleaseError, Result};
use crate::util::fs;
use crate::bail;
use std::path::{Path, PathBuf};

/// Bundle the project as a Windows executable.
///
/// # Process
///
/// 1. Selects a container engine (docker preferred, then podman); fatal if
///    neither is available, before any filesystem mutation
/// 2. Clears prior build intermediates
/// 3. Runs the packaging image with the project tree mounted
/// 4. Locates the produced executable in `dist/` (single-file mode: the exe
///    sits directly in the output directory, not nested)
/// 5. Copies it to the versioned output name
///
/// Returns the path of the versioned `.exe`.
pub async fn bundle_project(config: &BuildConfig, output: &OutputManager) -> Result<PathBuf> {
    output.section(&format!(
        "Windows build: {} {} ({})",
        config.product_name,
        config.version,
        config.arch.as_str()
    ));

    // 1. Engine selection, before any work
    let engine = ContainerEngine::detect()?;
    output.progress(&format!("using container engine: {}", engine.command()));

    // 2. Idempotent clean
    output.progress("cleaning build intermediates");
    clean_intermediates(config).await?;

    // 3. Containerized PyInstaller run
    let runner = ContainerRunner::new(
        engine,
        config.windows_image.clone(),
        config.project_root.clone(),
    );
    let result = runner.run(output).await?;

    if !result.status.success() {
        let stderr_tail: Vec<_> = result
            .stderr_lines
            .iter()
            .rev()
            .take(15)
            .rev()
            .cloned()
            .collect();
        bail!(
            "container build failed with status {:?}\n\
             \n\
             stderr tail:\n{}",
            result.status.code(),
            stderr_tail.join("\n")
        );
    }

    // 4. Output verification - a distinct failure point from the container
    // run itself: the image can exit zero and still produce nothing
    let artifact = config.artifact_path("exe");
    let dist = config.dist_dir();
    let produced = find_bundled_exe(&dist, &config.product_name, &artifact)?;

    // 5. Versioned output name
    output.progress(&format!("copying {} -> {}", produced.display(), artifact.display()));
    fs::copy_file(&produced, &artifact).await?;

    output.success(&format!("created {}", artifact.display()));
    Ok(artifact)
}

/// Clears prior intermediates: `build/` and the unversioned exe a previous
/// container run left in `dist/`.
///
/// The stale exe matters: a container run can exit zero while producing
/// nothing, and the output scan must then fail instead of handing the
/// previous run's binary to the release flow under the new version's name.
async fn clean_intermediates(config: &BuildConfig) -> Result<()> {
    fs::remove_dir_all(&config.build_dir()).await?;
    fs::remove_file(&config.dist_dir().join(format!("{}.exe", config.product_name))).await?;
    fs::create_dir_all(&config.dist_dir(), false).await
}

/// Locates the executable produced by the container in `dist/`.
///
/// Single-file mode assumption: the exe is expected directly in the output
/// directory. `<product>.exe` is preferred; otherwise the first other `.exe`
/// is taken (sorted for determinism). The already-versioned output name and
/// prior releases' versioned artifacts (`<product>-*.exe`) are ignored so a
/// re-run never picks up an old binary.
pub fn find_bundled_exe(dist: &Path, product: &str, exclude: &Path) -> Result<PathBuf> {
    let preferred = dist.join(format!("{product}.exe"));
    if preferred.is_file() {
        return Ok(preferred);
    }

    let versioned_prefix = format!("{product}-");
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dist)
        .map_err(|e| ReleaseError::Fs {
            context: "scanning output directory",
            path: dist.to_path_buf(),
            source: e,
        })?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("exe"))
                && path != exclude
                && !path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&versioned_prefix))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ReleaseError::ArtifactMissing {
            path: preferred,
            dir: dist.to_path_buf(),
            listing: fs::listing(dist),
        })
}
