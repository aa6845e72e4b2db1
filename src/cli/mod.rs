//! Command line interface for the ExPrac release tool.

mod args;
mod output;

pub use args::{Args, BuildCommand};
pub use output::OutputManager;

use crate::error::Result;
use crate::manifest::Manifest;
use crate::packager::{BuildConfig, Packager, Target};
use crate::release;
use crate::version::ReleaseVersion;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new(log::log_enabled!(log::Level::Debug));

    match args.command {
        BuildCommand::Appimage => {
            build_target(&args, Target::AppImage, &output).await?;
        }
        BuildCommand::Windows => {
            build_target(&args, Target::WindowsExe, &output).await?;
        }
        BuildCommand::Release => {
            release::run(&args.project_root, &output).await?;
        }
    }

    Ok(0)
}

/// Builds a single target at the current version.
async fn build_target(args: &Args, target: Target, output: &OutputManager) -> Result<()> {
    let manifest = Manifest::load(&args.project_root).await?;
    let version = ReleaseVersion::load(&args.project_root).await?;

    let config = BuildConfig::resolve(&args.project_root, &manifest, version)?;
    let artifact = Packager::new(config).package(target, output).await?;

    output.indent(&format!(
        "{}: {} ({} bytes, sha256 {})",
        artifact.target,
        artifact.path.display(),
        artifact.size,
        artifact.checksum
    ));

    Ok(())
}
