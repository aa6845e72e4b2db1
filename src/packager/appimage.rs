//! AppImage packager - portable Linux executable image.
//!
//! Produces `dist/<product>-<arch>-<version>.AppImage` from the PyInstaller
//! directory bundle. Any failing step aborts the run; the next run's clean
//! step removes whatever this one left behind.

use super::{BuildConfig, tools};
use crate::cli::OutputManager;
use crate::error::{ErrorExt, Result};
use crate::util::{fs, process};
use crate::bail;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Bundle the project as an AppImage.
///
/// # Process
///
/// 1. Ensures appimagetool is present (local tools dir, PATH, or one download)
/// 2. Clears prior build intermediates
/// 3. Invokes PyInstaller to produce the directory-form bundle
/// 4. Stages the bundle plus AppRun shim, desktop entry, and icon
/// 5. Invokes appimagetool to compress the staging directory
///
/// Returns the path of the generated `.AppImage`.
pub async fn bundle_project(config: &BuildConfig, output: &OutputManager) -> Result<PathBuf> {
    output.section(&format!(
        "AppImage build: {} {} ({})",
        config.product_name,
        config.version,
        config.arch.as_str()
    ));

    // 1. Tool acquisition happens before any cleanup so a missing tool leaves
    // the tree untouched
    let appimagetool = tools::ensure_appimagetool(&config.project_root, config.arch).await?;
    output.verbose(&format!("using appimagetool at {}", appimagetool.display()));

    // 2. Idempotent clean of intermediates
    let staging_root = config.build_dir().join("appimage");
    let bundle_dir = config.dist_dir().join(&config.product_name);
    output.progress("cleaning build intermediates");
    fs::remove_dir_all(&config.build_dir()).await?;
    fs::remove_dir_all(&bundle_dir).await?;
    fs::create_dir_all(&staging_root, false).await?;

    // 3. PyInstaller directory bundle
    output.progress(&format!("running pyinstaller {}", config.spec_file));
    run_pyinstaller(config).await?;

    if !bundle_dir.is_dir() {
        bail!(
            "pyinstaller succeeded but produced no bundle at {}\n\
             Check that {} uses directory (onedir) mode.",
            bundle_dir.display(),
            config.spec_file
        );
    }

    // 4. Stage the AppDir
    output.progress("staging AppDir");
    let app_dir = staging_root.join(format!("{}.AppDir", config.product_name));
    stage_app_dir(config, &bundle_dir, &app_dir).await?;

    // 5. Compress into the final artifact
    let artifact = config.artifact_path("AppImage");
    fs::create_dir_all(&config.dist_dir(), false).await?;

    output.progress("running appimagetool");
    process::run_checked(
        Command::new(&appimagetool)
            .env("ARCH", config.arch.as_str())
            .arg(&app_dir)
            .arg(&artifact),
        "appimagetool",
    )
    .await?;

    fs::make_executable(&artifact).await?;

    output.success(&format!("created {}", artifact.display()));
    Ok(artifact)
}

/// Runs PyInstaller against the bundler spec.
///
/// The project's `venv/bin` is prepended to `PATH` when present so spec-file
/// hooks resolve the venv interpreter, matching how releases have always been
/// built.
async fn run_pyinstaller(config: &BuildConfig) -> Result<()> {
    let pyinstaller = tools::resolve_pyinstaller(&config.project_root);

    let mut command = Command::new(&pyinstaller);
    command
        .current_dir(&config.project_root)
        .args(["--noconfirm", &config.spec_file]);

    let venv_bin = config.project_root.join("venv").join("bin");
    if venv_bin.is_dir() {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![venv_bin];
        paths.extend(std::env::split_paths(&path));
        let joined = std::env::join_paths(paths)
            .map_err(|e| crate::error::ReleaseError::Generic(e.to_string()))?;
        command.env("PATH", joined);
    }

    process::run_checked(&mut command, "pyinstaller").await
}

/// Assembles the AppDir staging directory.
///
/// Layout:
/// ```text
/// <product>.AppDir/
///   AppRun                    launcher shim (executable)
///   <product>.desktop         desktop-integration descriptor
///   <product>.png, .DirIcon   icon (when configured)
///   usr/bin/<product>/        the PyInstaller bundle
/// ```
async fn stage_app_dir(config: &BuildConfig, bundle_dir: &Path, app_dir: &Path) -> Result<()> {
    fs::create_dir_all(app_dir, true).await?;

    let staged_bundle = app_dir
        .join("usr")
        .join("bin")
        .join(&config.product_name);
    fs::copy_dir(bundle_dir, &staged_bundle).await?;

    // Launcher shim
    let apprun = app_dir.join("AppRun");
    tokio::fs::write(&apprun, apprun_script(&config.product_name))
        .await
        .fs_context("writing AppRun", &apprun)?;
    fs::make_executable(&apprun).await?;

    // Desktop entry
    let desktop = app_dir.join(format!("{}.desktop", config.product_name));
    tokio::fs::write(
        &desktop,
        desktop_entry(&config.product_name, config.categories.as_deref()),
    )
    .await
    .fs_context("writing desktop entry", &desktop)?;

    // Icon plus the .DirIcon link the AppImage spec expects
    if let Some(icon) = &config.icon {
        let icon_src = config.project_root.join(icon);
        let icon_name = format!("{}.png", config.product_name);
        let icon_dst = app_dir.join(&icon_name);
        fs::copy_file(&icon_src, &icon_dst).await?;

        #[cfg(unix)]
        {
            let diricon = app_dir.join(".DirIcon");
            tokio::fs::symlink(&icon_name, &diricon)
                .await
                .fs_context("creating .DirIcon symlink", &diricon)?;
        }
    } else {
        log::warn!("no AppImage icon configured; appimagetool may complain");
    }

    Ok(())
}

/// Renders the AppRun launcher shim.
fn apprun_script(product: &str) -> String {
    format!(
        "#!/bin/sh\n\
         HERE=\"$(dirname \"$(readlink -f \"$0\")\")\"\n\
         exec \"$HERE/usr/bin/{product}/{product}\" \"$@\"\n"
    )
}

/// Renders the freedesktop desktop entry.
///
/// `Terminal=true`: the product is a terminal application.
fn desktop_entry(product: &str, categories: Option<&str>) -> String {
    let mut entry = String::from("[Desktop Entry]\nType=Application\n");
    entry.push_str(&format!("Name={product}\n"));
    entry.push_str(&format!("Exec={product}\n"));
    entry.push_str(&format!("Icon={product}\n"));
    if let Some(categories) = categories {
        entry.push_str(&format!("Categories={categories}\n"));
    }
    entry.push_str("Terminal=true\n");
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apprun_executes_bundled_binary() {
        let script = apprun_script("ExPrac");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("usr/bin/ExPrac/ExPrac"));
        assert!(script.contains("\"$@\""));
    }

    #[test]
    fn desktop_entry_is_terminal_application() {
        let entry = desktop_entry("ExPrac", Some("Utility;"));
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Name=ExPrac\n"));
        assert!(entry.contains("Exec=ExPrac\n"));
        assert!(entry.contains("Categories=Utility;\n"));
        assert!(entry.contains("Terminal=true\n"));
    }

    #[test]
    fn desktop_entry_omits_unset_categories() {
        let entry = desktop_entry("ExPrac", None);
        assert!(!entry.contains("Categories="));
    }
}
