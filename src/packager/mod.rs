//! Packaging orchestration.
//!
//! Coordinates the per-target packagers (AppImage on Linux hosts, Windows exe
//! via container) and wraps their outputs in [`PackagedArtifact`] records with
//! size and SHA-256 checksum.

pub mod appimage;
mod checksum;
pub mod tools;
pub mod windows;

pub use checksum::calculate_sha256;

use crate::cli::OutputManager;
use crate::error::{ErrorExt, Result};
use crate::manifest::Manifest;
use crate::version::ReleaseVersion;
use std::fmt;
use std::path::{Path, PathBuf};

/// CPU architecture of the produced artifacts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arch {
    /// x86_64 / AMD64
    X86_64,
    /// AArch64 / ARM64
    AArch64,
}

impl Arch {
    /// Detects the host architecture.
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "aarch64" => Self::AArch64,
            _ => Self::X86_64,
        }
    }

    /// Returns the architecture label used in artifact names and by
    /// appimagetool's `ARCH` variable.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::AArch64 => "aarch64",
        }
    }
}

/// Packaging target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target {
    /// Portable Linux AppImage
    AppImage,
    /// Windows single-file executable, cross-built in a container
    WindowsExe,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppImage => write!(f, "AppImage"),
            Self::WindowsExe => write!(f, "Windows exe"),
        }
    }
}

/// A produced artifact with verification metadata.
#[derive(Debug)]
pub struct PackagedArtifact {
    /// Target that produced this artifact
    pub target: Target,
    /// Final artifact path under `dist/`
    pub path: PathBuf,
    /// Artifact size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 checksum
    pub checksum: String,
}

/// Resolved build configuration shared by both packagers.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Absolute project root (mounted into containers, so it must be absolute)
    pub project_root: PathBuf,
    /// Product name, used for bundle directory and artifact names
    pub product_name: String,
    /// PyInstaller bundler spec file, relative to the project root
    pub spec_file: String,
    /// Version stamped into artifact names
    pub version: ReleaseVersion,
    /// Architecture label
    pub arch: Arch,
    /// AppImage icon, relative to the project root
    pub icon: Option<PathBuf>,
    /// Desktop-entry categories
    pub categories: Option<String>,
    /// Container image for the Windows cross-build
    pub windows_image: String,
}

impl BuildConfig {
    /// Resolves a build configuration from the manifest and version.
    ///
    /// The project root is canonicalized; a root that does not exist is an
    /// error here, before any packager runs.
    pub fn resolve(project_root: &Path, manifest: &Manifest, version: ReleaseVersion) -> Result<Self> {
        let project_root = project_root
            .canonicalize()
            .fs_context("resolving project root", project_root)?;

        Ok(Self {
            project_root,
            product_name: manifest.product_name().to_string(),
            spec_file: manifest.spec_file(),
            version,
            arch: Arch::host(),
            icon: manifest.appimage_icon().map(PathBuf::from),
            categories: manifest.desktop_categories().map(String::from),
            windows_image: manifest.windows_image().to_string(),
        })
    }

    /// The `dist/` output directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.project_root.join("dist")
    }

    /// The `build/` intermediates directory.
    pub fn build_dir(&self) -> PathBuf {
        self.project_root.join("build")
    }

    /// Final artifact path: `dist/<product>-<arch>-<version>.<ext>`.
    pub fn artifact_path(&self, ext: &str) -> PathBuf {
        self.dist_dir().join(format!(
            "{}-{}-{}.{}",
            self.product_name,
            self.arch.as_str(),
            self.version,
            ext
        ))
    }
}

/// Packager coordinating the per-target builds.
pub struct Packager {
    config: BuildConfig,
}

impl Packager {
    /// Creates a packager for the given configuration.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Returns the build configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds one target and returns its artifact record.
    ///
    /// Exit of this function with `Ok` guarantees the artifact exists at the
    /// recorded path.
    pub async fn package(&self, target: Target, output: &OutputManager) -> Result<PackagedArtifact> {
        let path = match target {
            Target::AppImage => appimage::bundle_project(&self.config, output).await?,
            Target::WindowsExe => windows::bundle_project(&self.config, output).await?,
        };

        let metadata = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?;
        let checksum = calculate_sha256(&path).await?;

        Ok(PackagedArtifact {
            target,
            path,
            size: metadata.len(),
            checksum,
        })
    }
}
