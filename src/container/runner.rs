//! Container execution and process management.

use super::{ContainerEngine, ContainerGuard};
use crate::cli::OutputManager;
use crate::error::{CliError, ReleaseError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use uuid::Uuid;

/// Timeout for a container run (30 minutes).
///
/// The Windows image installs Python dependencies and runs a full PyInstaller
/// build, which can be slow on cold caches.
pub const CONTAINER_RUN_TIMEOUT: Duration = Duration::from_secs(1800);

/// Result of a container execution.
#[derive(Debug)]
pub struct ContainerRunResult {
    /// Exit status of the container
    pub status: std::process::ExitStatus,
    /// Captured stderr lines
    pub stderr_lines: Vec<String>,
}

/// Runs the Windows packaging image with the project tree mounted.
pub struct ContainerRunner {
    engine: ContainerEngine,
    image: String,
    project_root: PathBuf,
}

impl ContainerRunner {
    /// Creates a new container runner.
    ///
    /// `project_root` must be an absolute path; relative paths are not
    /// meaningful as mount sources.
    pub fn new(engine: ContainerEngine, image: String, project_root: PathBuf) -> Self {
        Self {
            engine,
            image,
            project_root,
        }
    }

    /// Builds the engine arguments for the packaging run.
    ///
    /// The project tree is mounted read-write at `/src`, the image's expected
    /// mount point; its entrypoint installs requirements and invokes
    /// PyInstaller against the bundler spec.
    pub fn build_run_args(&self, container_name: &str) -> Vec<String> {
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container_name.to_string(),
            "-v".to_string(),
            format!("{}:/src:rw", self.project_root.display()),
            self.image.clone(),
        ]
    }

    /// Runs the container to completion, streaming stdout to the console.
    ///
    /// stderr is captured for the failure report. The run is bounded by
    /// [`CONTAINER_RUN_TIMEOUT`]; on expiry the process is killed and the run
    /// fails.
    pub async fn run(&self, output: &OutputManager) -> Result<ContainerRunResult> {
        self.run_with_timeout(output, CONTAINER_RUN_TIMEOUT).await
    }

    /// Like [`run`](Self::run) with an explicit time bound.
    pub async fn run_with_timeout(
        &self,
        output: &OutputManager,
        timeout: Duration,
    ) -> Result<ContainerRunResult> {
        let container_name = format!("exprac-build-{}", Uuid::new_v4());
        let run_args = self.build_run_args(&container_name);

        // Cleanup on every exit path, including timeout
        let _guard = ContainerGuard::new(self.engine, container_name.clone());

        output.progress(&format!(
            "{} run {} ({})",
            self.engine.command(),
            self.image,
            container_name
        ));
        output.verbose(&format!(
            "{} {}",
            self.engine.command(),
            run_args.join(" ")
        ));

        let child = Command::new(self.engine.command())
            .args(&run_args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReleaseError::Cli(CliError::ExecutionFailed {
                    command: format!("{} run {}", self.engine.command(), self.image),
                    reason: e.to_string(),
                })
            })?;

        supervise(
            child,
            format!("{} run", self.engine.command()),
            timeout,
            output,
        )
        .await
    }
}

/// Drains the child's output streams and waits for its exit, all bounded by
/// `timeout`.
///
/// The bound must cover the stream draining, not just the final wait: a
/// container that hangs while holding stdout open never reaches EOF, and
/// waiting for EOF first would defeat the timeout entirely. On expiry the
/// process is killed and given a short grace period to be reaped.
async fn supervise(
    mut child: tokio::process::Child,
    command_label: String,
    timeout: Duration,
    output: &OutputManager,
) -> Result<ContainerRunResult> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let drain_and_wait = async {
        let (_, stderr_lines) = tokio::join!(
            async {
                if let Some(stdout) = stdout {
                    let mut lines = BufReader::new(stdout).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        output.indent(&line);
                    }
                }
            },
            async {
                let mut captured = Vec::new();
                if let Some(stderr) = stderr {
                    let mut lines = BufReader::new(stderr).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        captured.push(line);
                    }
                }
                captured
            }
        );
        let status = child.wait().await;
        (status, stderr_lines)
    };

    match tokio::time::timeout(timeout, drain_and_wait).await {
        Ok((Ok(status), stderr_lines)) => Ok(ContainerRunResult {
            status,
            stderr_lines,
        }),
        Ok((Err(e), _)) => Err(ReleaseError::Cli(CliError::ExecutionFailed {
            command: command_label,
            reason: e.to_string(),
        })),
        Err(_elapsed) => {
            output.warn(&format!(
                "container build timed out after {} seconds, terminating",
                timeout.as_secs()
            ));

            if let Err(e) = child.kill().await {
                log::warn!("failed to kill container process: {e}");
            }
            let _ = tokio::time::timeout(Duration::from_secs(10), child.wait()).await;

            Err(ReleaseError::Cli(CliError::ExecutionFailed {
                command: command_label,
                reason: format!("timed out after {} seconds", timeout.as_secs()),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_args_mount_project_at_src() {
        let runner = ContainerRunner::new(
            ContainerEngine::Docker,
            "batonogov/pyinstaller-windows:latest".to_string(),
            PathBuf::from("/home/dev/exprac"),
        );
        let args = runner.build_run_args("exprac-build-test");

        assert_eq!(args[0], "run");
        assert!(args.contains(&"--rm".to_string()));
        assert!(args.contains(&"/home/dev/exprac:/src:rw".to_string()));
        // Image comes last so the entrypoint's own arguments stay untouched
        assert_eq!(args.last().unwrap(), "batonogov/pyinstaller-windows:latest");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn supervise_collects_status_and_stderr() {
        let child = Command::new("sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let result = supervise(
            child,
            "sh run".to_string(),
            Duration::from_secs(10),
            &OutputManager::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.status.code(), Some(3));
        assert_eq!(result.stderr_lines, vec!["err".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_fires_while_output_streams_are_still_open() {
        // The child never exits and never closes stdout, so stream draining
        // alone would block forever; the time bound has to cut it off.
        let child = Command::new("sh")
            .args(["-c", "sleep 30"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let err = supervise(
            child,
            "sh run".to_string(),
            Duration::from_millis(200),
            &OutputManager::default(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }
}
