//! Container engine integration for the Windows cross-build.
//!
//! The Windows executable is produced inside a Linux container carrying a
//! Wine/PyInstaller toolchain, so no Windows host is needed. This module
//! selects an available engine and manages the container run.

mod guard;
mod runner;

pub use guard::ContainerGuard;
pub use runner::{ContainerRunResult, ContainerRunner};

use crate::error::{ReleaseError, Result};

/// A container engine available on this host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContainerEngine {
    /// Docker (preferred)
    Docker,
    /// Podman (fallback)
    Podman,
}

impl ContainerEngine {
    /// Engine binaries probed, in preference order.
    pub const CANDIDATES: [&'static str; 2] = ["docker", "podman"];

    /// Selects the first available engine, preferring docker.
    ///
    /// This check runs before any filesystem mutation: a host with no engine
    /// fails here, leaving `dist/` and `build/` untouched.
    pub fn detect() -> Result<Self> {
        Self::detect_with(|name| which::which(name).is_ok())
    }

    /// Engine selection with an injectable binary resolver.
    pub fn detect_with<F>(resolves: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        for candidate in Self::CANDIDATES {
            if resolves(candidate) {
                let engine = match candidate {
                    "docker" => Self::Docker,
                    _ => Self::Podman,
                };
                log::debug!("selected container engine: {candidate}");
                return Ok(engine);
            }
        }

        Err(ReleaseError::NoContainerEngine {
            candidates: Self::CANDIDATES.to_vec(),
        })
    }

    /// Returns the engine binary name.
    pub fn command(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_docker_when_both_available() {
        let engine = ContainerEngine::detect_with(|_| true).unwrap();
        assert_eq!(engine, ContainerEngine::Docker);
    }

    #[test]
    fn falls_back_to_podman() {
        let engine = ContainerEngine::detect_with(|name| name == "podman").unwrap();
        assert_eq!(engine, ContainerEngine::Podman);
    }

    #[test]
    fn errors_when_neither_available() {
        let err = ContainerEngine::detect_with(|_| false).unwrap_err();
        assert!(matches!(err, ReleaseError::NoContainerEngine { .. }));
        assert!(err.to_string().contains("docker"));
        assert!(err.to_string().contains("podman"));
    }
}
