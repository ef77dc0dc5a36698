//! Running validated commands with captured output

use std::process::Stdio;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::launcher::ProcessLauncher;
use crate::errors::{CurlpadError, Result};
use crate::validate::{validate, ValidatedCommand};

/// Default per-command ceiling
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Captured result of one executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or -1 when the process was killed by a signal
    pub status: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs commands one at a time through a [`ProcessLauncher`]
pub struct Executor<'a> {
    launcher: &'a dyn ProcessLauncher,
    timeout: Duration,
    cancel: CancellationToken,
}

impl<'a> Executor<'a> {
    pub fn new(launcher: &'a dyn ProcessLauncher, timeout: Duration, cancel: CancellationToken) -> Self {
        Self { launcher, timeout, cancel }
    }

    /// Validate again, spawn without a shell, and wait for the child.
    ///
    /// The child is killed if the timeout elapses or the run is cancelled
    /// while it is still running.
    pub async fn execute(&self, cmd: &ValidatedCommand) -> Result<ExecutionResult> {
        let checked = validate(cmd.as_str())?;

        if self.cancel.is_cancelled() {
            return Err(CurlpadError::Cancelled);
        }

        let argv = self.launcher.tokenize(checked.as_str())?;
        let mut command = self.launcher.command(&argv)?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(launcher = self.launcher.name(), argv = ?argv, "Spawning command");
        let child = command
            .spawn()
            .map_err(|e| CurlpadError::Spawn(format!("{}: {}", argv[0], e)))?;

        tokio::select! {
            output = child.wait_with_output() => {
                let output = output.map_err(|e| CurlpadError::Spawn(format!("failed to wait for {}: {}", argv[0], e)))?;
                let status = output.status.code().unwrap_or(-1);
                debug!(exit_code = status, "Process exited");
                Ok(ExecutionResult {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    status,
                })
            }
            _ = tokio::time::sleep(self.timeout) => {
                debug!(timeout = ?self.timeout, "Command timed out; killing child");
                Err(CurlpadError::Timeout { seconds: self.timeout.as_secs() })
            }
            _ = self.cancel.cancelled() => {
                debug!("Cancelled while command was running; killing child");
                Err(CurlpadError::Cancelled)
            }
        }
    }
}
