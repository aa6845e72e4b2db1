//! Release and packaging automation for the ExPrac terminal application.
//!
//! This library provides the building blocks behind the `exprac_release`
//! binary:
//! - the Linux AppImage packager (PyInstaller bundle + appimagetool)
//! - the Windows packager (PyInstaller inside a container, no Windows host)
//! - the release orchestrator (version bump, commit, build, publish)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod container;
pub mod error;
pub mod manifest;
pub mod packager;
pub mod release;
pub mod util;
pub mod version;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
pub use manifest::Manifest;
pub use version::ReleaseVersion;
