//! Command line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release and packaging tool for the ExPrac terminal application
#[derive(Parser, Debug)]
#[command(
    name = "exprac_release",
    version,
    about = "Release and packaging tool for ExPrac",
    long_about = "Builds portable ExPrac artifacts and publishes releases.

Replaces the old appimage.sh / windows.sh / release.py trio with one binary:

  exprac_release appimage    build dist/ExPrac-<arch>-<version>.AppImage
  exprac_release windows     cross-build dist/ExPrac-<arch>-<version>.exe in a container
  exprac_release release     bump the version, build both, publish to GitHub

The current version is read from packaging/VERSION, the single source of
truth for the release tag. Exit code 0 guarantees the subcommand's artifact
exists at its versioned path."
)]
pub struct Args {
    /// ExPrac project root containing the PyInstaller spec and packaging/
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub project_root: PathBuf,

    #[command(subcommand)]
    pub command: BuildCommand,
}

/// Subcommands, one per pipeline entry point.
#[derive(Subcommand, Debug)]
pub enum BuildCommand {
    /// Build the portable Linux AppImage
    Appimage,
    /// Cross-build the Windows executable in a container
    Windows,
    /// Bump the version, build both artifacts, and publish a GitHub release
    Release,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let args = Args::try_parse_from(["exprac_release", "appimage"]).unwrap();
        assert!(matches!(args.command, BuildCommand::Appimage));
        assert_eq!(args.project_root, PathBuf::from("."));

        let args = Args::try_parse_from(["exprac_release", "windows"]).unwrap();
        assert!(matches!(args.command, BuildCommand::Windows));

        let args = Args::try_parse_from(["exprac_release", "release"]).unwrap();
        assert!(matches!(args.command, BuildCommand::Release));
    }

    #[test]
    fn project_root_is_global() {
        let args =
            Args::try_parse_from(["exprac_release", "appimage", "--project-root", "/tmp/x"])
                .unwrap();
        assert_eq!(args.project_root, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Args::try_parse_from(["exprac_release"]).is_err());
    }
}
