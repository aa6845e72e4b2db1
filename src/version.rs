//! Release version handling.
//!
//! The release tag has the form `v<major>.<minor>` (e.g. `v1.3`) and lives in
//! exactly one file, `packaging/VERSION`, which every build path reads. The
//! shell-era tooling duplicated the literal across two scripts and relied on
//! bump discipline; the single file removes that drift hazard.

use crate::error::{ErrorExt, ReleaseError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Location of the version file, relative to the project root.
pub const VERSION_FILE: &str = "packaging/VERSION";

/// A release version of the form `v<major>.<minor>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ReleaseVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl ReleaseVersion {
    /// Creates a version from its components.
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns the next release version (minor incremented).
    ///
    /// This is the bump the release orchestrator applies; the major component
    /// is only ever changed by hand. A minor component at its numeric limit is
    /// an error, not a wrap.
    pub fn bump_minor(self) -> Result<Self> {
        let minor = self
            .minor
            .checked_add(1)
            .ok_or_else(|| ReleaseError::Version {
                tag: self.to_string(),
                reason: "minor component overflow".to_string(),
            })?;
        Ok(Self {
            major: self.major,
            minor,
        })
    }

    /// Returns the path of the version file under `project_root`.
    pub fn file_path(project_root: &Path) -> PathBuf {
        project_root.join(VERSION_FILE)
    }

    /// Reads the current version from `packaging/VERSION`.
    pub async fn load(project_root: &Path) -> Result<Self> {
        let path = Self::file_path(project_root);
        let content = tokio::fs::read_to_string(&path)
            .await
            .fs_context("reading version file", &path)?;
        content.trim().parse()
    }

    /// Rewrites `packaging/VERSION` with this version.
    ///
    /// Creates the `packaging/` directory if it does not exist yet.
    pub async fn store(self, project_root: &Path) -> Result<()> {
        let path = Self::file_path(project_root);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating packaging directory", parent)?;
        }
        tokio::fs::write(&path, format!("{self}\n"))
            .await
            .fs_context("writing version file", &path)
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ReleaseError::Version {
            tag: s.to_string(),
            reason: reason.to_string(),
        };

        let rest = s
            .strip_prefix('v')
            .ok_or_else(|| invalid("must start with 'v'"))?;

        let (major, minor) = rest
            .split_once('.')
            .ok_or_else(|| invalid("expected v<major>.<minor>"))?;

        if minor.contains('.') {
            return Err(invalid("expected exactly two components"));
        }

        let parse_component = |c: &str| -> Result<u32> {
            if c.is_empty() || !c.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("components must be decimal numbers"));
            }
            c.parse()
                .map_err(|_| invalid("component out of range"))
        };

        Ok(Self {
            major: parse_component(major)?,
            minor: parse_component(minor)?,
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_tags() {
        let v: ReleaseVersion = "v1.3".parse().unwrap();
        assert_eq!(v, ReleaseVersion::new(1, 3));
        assert_eq!("v0.0".parse::<ReleaseVersion>().unwrap(), ReleaseVersion::new(0, 0));
        assert_eq!("v12.345".parse::<ReleaseVersion>().unwrap(), ReleaseVersion::new(12, 345));
    }

    #[test]
    fn rejects_malformed_tags() {
        for tag in ["1.3", "v1", "v1.3.4", "va.b", "v1.", "v.3", "v 1.3", "v-1.3", ""] {
            assert!(tag.parse::<ReleaseVersion>().is_err(), "accepted {tag:?}");
        }
    }

    #[test]
    fn renders_back_to_tag_form() {
        assert_eq!(ReleaseVersion::new(1, 3).to_string(), "v1.3");
        let round: ReleaseVersion = "v2.17".parse().unwrap();
        assert_eq!(round.to_string(), "v2.17");
    }

    #[test]
    fn bump_increments_minor_only() {
        let v = ReleaseVersion::new(1, 3).bump_minor().unwrap();
        assert_eq!(v, ReleaseVersion::new(1, 4));
    }

    #[test]
    fn bump_rejects_minor_at_numeric_limit() {
        let err = ReleaseVersion::new(1, u32::MAX).bump_minor().unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[tokio::test]
    async fn load_and_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let v = ReleaseVersion::new(1, 3);
        v.store(dir.path()).await.unwrap();

        let content = tokio::fs::read_to_string(dir.path().join(VERSION_FILE))
            .await
            .unwrap();
        assert_eq!(content, "v1.3\n");

        let loaded = ReleaseVersion::load(dir.path()).await.unwrap();
        assert_eq!(loaded, v);
    }

    #[tokio::test]
    async fn load_tolerates_trailing_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = ReleaseVersion::file_path(dir.path());
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "v1.3\n\n").await.unwrap();

        let loaded = ReleaseVersion::load(dir.path()).await.unwrap();
        assert_eq!(loaded, ReleaseVersion::new(1, 3));
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleaseVersion::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("VERSION"));
    }
}
