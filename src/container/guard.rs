//! RAII guard for container cleanup.

use super::ContainerEngine;

/// Removes the named container on drop, covering error and timeout paths.
///
/// Removal is best-effort: the container normally no longer exists (runs use
/// `--rm`), and a failed `rm` must not mask the original build error.
pub struct ContainerGuard {
    engine: ContainerEngine,
    name: String,
}

impl ContainerGuard {
    /// Creates a guard for the given container name.
    pub fn new(engine: ContainerEngine, name: String) -> Self {
        Self { engine, name }
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        let result = std::process::Command::new(self.engine.command())
            .args(["rm", "-f", &self.name])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();

        if let Err(e) = result {
            log::debug!("container cleanup skipped for {}: {e}", self.name);
        }
    }
}
