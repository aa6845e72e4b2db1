//! Packaging manifest loaded from `packaging/exprac.toml`.
//!
//! The manifest carries the product metadata and per-target packaging options.
//! Every field has a default so the file may be partial or absent entirely;
//! unknown keys are rejected so typos surface instead of being ignored.
//!
//! ```toml
//! [package]
//! product_name = "ExPrac"
//! spec_file = "ExPrac.spec"
//!
//! [appimage]
//! icon = "packaging/appimage/exprac.png"
//! categories = "Utility;"
//!
//! [windows]
//! image = "batonogov/pyinstaller-windows:latest"
//! ```

use crate::error::{ErrorExt, Result};
use crate::version::ReleaseVersion;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Location of the packaging manifest, relative to the project root.
pub const MANIFEST_FILE: &str = "packaging/exprac.toml";

/// Default product name used when the manifest omits one.
const DEFAULT_PRODUCT: &str = "ExPrac";

/// Default container image for the Windows cross-build.
///
/// The image installs the project's Python dependencies and runs PyInstaller
/// against the bundler spec inside a Wine toolchain.
const DEFAULT_WINDOWS_IMAGE: &str = "batonogov/pyinstaller-windows:latest";

/// Packaging configuration for one project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Manifest {
    package: PackageSection,
    appimage: AppImageSection,
    windows: WindowsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct PackageSection {
    product_name: Option<String>,
    spec_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct AppImageSection {
    icon: Option<PathBuf>,
    categories: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct WindowsSection {
    image: Option<String>,
}

impl Manifest {
    /// Loads the manifest from `packaging/exprac.toml` under `project_root`.
    ///
    /// A missing file yields the all-defaults manifest; a present but
    /// malformed file is an error.
    pub async fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(MANIFEST_FILE);
        if !path.exists() {
            log::debug!("no packaging manifest at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .fs_context("reading packaging manifest", &path)?;
        Self::parse(&content)
    }

    /// Parses manifest TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the product name (`ExPrac` unless overridden).
    pub fn product_name(&self) -> &str {
        self.package.product_name.as_deref().unwrap_or(DEFAULT_PRODUCT)
    }

    /// Returns the PyInstaller bundler spec file name.
    ///
    /// Defaults to `<product>.spec`.
    pub fn spec_file(&self) -> String {
        self.package
            .spec_file
            .clone()
            .unwrap_or_else(|| format!("{}.spec", self.product_name()))
    }

    /// Returns the AppImage icon path (relative to the project root), if configured.
    pub fn appimage_icon(&self) -> Option<&Path> {
        self.appimage.icon.as_deref()
    }

    /// Returns the desktop-entry categories string, if configured.
    pub fn desktop_categories(&self) -> Option<&str> {
        self.appimage.categories.as_deref()
    }

    /// Returns the container image used for the Windows cross-build.
    pub fn windows_image(&self) -> &str {
        self.windows.image.as_deref().unwrap_or(DEFAULT_WINDOWS_IMAGE)
    }

    /// Derives a versioned artifact file name: `<product>-<arch>-<version>.<ext>`.
    pub fn artifact_name(&self, arch: &str, version: ReleaseVersion, ext: &str) -> String {
        format!("{}-{}-{}.{}", self.product_name(), arch, version, ext)
    }
}
