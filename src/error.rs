//! Error types for release and packaging operations.
//!
//! This module defines all error types with actionable error messages, plus
//! small helpers (`bail!`, [`Context`], [`ErrorExt`]) for attaching context
//! to failures.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Packaging manifest parse errors
    #[error("manifest error: {0}")]
    Manifest(#[from] toml::de::Error),

    /// HTTP download errors
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Malformed version tag
    #[error("invalid version tag {tag:?}: {reason}")]
    Version {
        /// The literal that failed to parse
        tag: String,
        /// Reason for the error
        reason: String,
    },

    /// Filesystem operation failure with context
    #[error("{context}: {}: {source}", path.display())]
    Fs {
        /// What was being attempted
        context: &'static str,
        /// Path involved in the operation
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// No container engine available on this host
    #[error(
        "no container engine found (tried: {})\n\
         \n\
         The Windows build runs PyInstaller inside a container.\n\
         Install Docker or Podman and ensure it is on PATH.",
        candidates.join(", ")
    )]
    NoContainerEngine {
        /// Engine binaries that were probed
        candidates: Vec<&'static str>,
    },

    /// Expected build artifact absent after an apparently successful build
    #[error(
        "expected artifact not found: {}\n\
         \n\
         Contents of {}:\n\
         {listing}",
        path.display(),
        dir.display()
    )]
    ArtifactMissing {
        /// Artifact path that was expected
        path: PathBuf,
        /// Directory that was scanned
        dir: PathBuf,
        /// Listing of what the directory actually contains
        listing: String,
    },

    /// Generic errors
    #[error("{0}")]
    Generic(String),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// External command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Early-return with a [`ReleaseError::Generic`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::ReleaseError::Generic(format!($($arg)*)))
    };
}

/// Attach a static message to an `Option`, producing a [`ReleaseError`].
pub trait Context<T> {
    /// Convert into `Result`, using `msg` as the error message when absent.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| ReleaseError::Generic(msg.to_string()))
    }
}

/// Attach filesystem context (operation + path) to IO results.
pub trait ErrorExt<T> {
    /// Wrap an IO error with the operation being attempted and the path involved.
    fn fs_context(self, context: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| ReleaseError::Fs {
            context,
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_carries_path_and_operation() {
        let err: Result<()> = Err(std::io::Error::from(std::io::ErrorKind::NotFound))
            .fs_context("reading manifest", Path::new("packaging/exprac.toml"));
        let msg = err.unwrap_err().to_string();
        assert!(msg.contains("reading manifest"));
        assert!(msg.contains("packaging/exprac.toml"));
    }

    #[test]
    fn no_engine_error_names_candidates() {
        let err = ReleaseError::NoContainerEngine {
            candidates: vec!["docker", "podman"],
        };
        let msg = err.to_string();
        assert!(msg.contains("docker, podman"));
    }
}
