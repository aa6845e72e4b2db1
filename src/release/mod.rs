//! Release orchestration.
//!
//! A linear, non-resumable sequence: bump the version, commit it, build both
//! artifacts, publish a hosted release. There is no rollback; a failure after
//! the version commit leaves the repository ahead of its published artifacts,
//! and the error says so.

use crate::cli::OutputManager;
use crate::error::{CliError, ReleaseError, Result};
use crate::manifest::Manifest;
use crate::packager::{BuildConfig, PackagedArtifact, Packager, Target};
use crate::util::{fs, process};
use crate::version::{ReleaseVersion, VERSION_FILE};
use std::path::Path;
use tokio::process::Command;

/// Runs the full release sequence for the project at `project_root`.
pub async fn run(project_root: &Path, output: &OutputManager) -> Result<()> {
    let manifest = Manifest::load(project_root).await?;

    // 1. Determine current version and increment
    let current = ReleaseVersion::load(project_root).await?;
    let next = current.bump_minor()?;
    output.section(&format!("Release {} -> {}", current, next));

    // 2. Rewrite the single version source
    next.store(project_root).await?;
    output.progress(&format!("updated {} to {}", VERSION_FILE, next));

    // 3. Commit the bump when inside a git repository
    let committed = commit_version_bump(project_root, next, output).await?;

    // 4..6. Everything after the commit is non-resumable; annotate failures
    // so the operator knows the repository is already ahead
    match build_and_publish(project_root, &manifest, next, output).await {
        Ok(()) => {
            output.success(&format!("release {} complete", next));
            Ok(())
        }
        Err(e) if committed => Err(ReleaseError::Generic(format!(
            "{e}\n\n\
             The version bump to {next} is already committed; the repository \
             is ahead of its published artifacts."
        ))),
        Err(e) => Err(e),
    }
}

/// Commits the rewritten version file. Returns whether a commit was made.
///
/// A project root that is not a git repository skips this step, matching the
/// original release flow.
async fn commit_version_bump(
    project_root: &Path,
    version: ReleaseVersion,
    output: &OutputManager,
) -> Result<bool> {
    if !project_root.join(".git").is_dir() {
        output.warn("not a git repository, skipping version commit");
        return Ok(false);
    }

    output.progress("committing version bump");
    process::run_checked(
        Command::new("git")
            .current_dir(project_root)
            .args(["add", VERSION_FILE]),
        "git add",
    )
    .await?;
    process::run_checked(
        Command::new("git")
            .current_dir(project_root)
            .args(["commit", "-m", &format!("Bump version to {version}")]),
        "git commit",
    )
    .await?;

    Ok(true)
}

/// Builds both artifacts in sequence, verifies them, and creates the hosted release.
async fn build_and_publish(
    project_root: &Path,
    manifest: &Manifest,
    version: ReleaseVersion,
    output: &OutputManager,
) -> Result<()> {
    let config = BuildConfig::resolve(project_root, manifest, version)?;
    let packager = Packager::new(config);

    // Strictly sequential: AppImage first, then the container build
    let mut artifacts = Vec::new();
    for target in [Target::AppImage, Target::WindowsExe] {
        let artifact = packager.package(target, output).await?;
        output.indent(&format!(
            "{}: {} ({} bytes, sha256 {})",
            artifact.target,
            artifact.path.display(),
            artifact.size,
            artifact.checksum
        ));
        artifacts.push(artifact);
    }

    verify_artifacts(&artifacts, packager.config())?;

    publish(project_root, version, &artifacts, output).await
}

/// Re-checks that every expected artifact exists before publishing.
///
/// The packagers already guarantee this on success; the extra check keeps the
/// publish step from ever attaching a missing file, and its failure report
/// lists what `dist/` actually contains.
fn verify_artifacts(artifacts: &[PackagedArtifact], config: &BuildConfig) -> Result<()> {
    for artifact in artifacts {
        if !artifact.path.is_file() {
            let dist = config.dist_dir();
            return Err(ReleaseError::ArtifactMissing {
                path: artifact.path.clone(),
                dir: dist.clone(),
                listing: fs::listing(&dist),
            });
        }
    }
    Ok(())
}

/// Creates the hosted release with both artifacts attached.
async fn publish(
    project_root: &Path,
    version: ReleaseVersion,
    artifacts: &[PackagedArtifact],
    output: &OutputManager,
) -> Result<()> {
    if which::which("gh").is_err() {
        return Err(ReleaseError::Cli(CliError::ExecutionFailed {
            command: "gh".to_string(),
            reason: "GitHub CLI not found on PATH; install gh to publish releases".to_string(),
        }));
    }

    output.progress(&format!("creating GitHub release {version}"));

    let tag = version.to_string();
    let mut command = Command::new("gh");
    command
        .current_dir(project_root)
        .args(["release", "create", &tag])
        .args(["--title", &format!("Release {tag}")])
        .args(["--notes", &format!("Automated release of version {tag}.")]);
    for artifact in artifacts {
        command.arg(&artifact.path);
    }

    process::run_checked(&mut command, "gh release create").await
}
