//! External process execution helpers.
//!
//! Every build step shells out to an external tool (pyinstaller, appimagetool,
//! docker/podman, git, gh). Failure of any step aborts the whole run; nothing
//! here retries.

use crate::error::{CliError, ReleaseError, Result};
use tokio::process::Command;

/// Runs a command to completion, inheriting stdio, and fails on non-zero exit.
///
/// `what` names the step for error reporting (e.g. `"pyinstaller"`).
pub async fn run_checked(command: &mut Command, what: &str) -> Result<()> {
    log::debug!("running step: {what}");

    let status = command.status().await.map_err(|e| {
        ReleaseError::Cli(CliError::ExecutionFailed {
            command: what.to_string(),
            reason: format!("failed to start: {e}"),
        })
    })?;

    if !status.success() {
        return Err(ReleaseError::Cli(CliError::ExecutionFailed {
            command: what.to_string(),
            reason: format!("exited with status {:?}", status.code()),
        }));
    }

    Ok(())
}
