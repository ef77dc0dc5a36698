//! Exit status codes for the CLI
//!
//! curlpad follows standard Unix exit code conventions:
//! - 0: Success (including a declined confirmation or a cancelled run)
//! - 1: Any error (rejected command, unreadable buffer, a command that failed)
//! - 130: Forced exit on a second Ctrl+C (standard SIGINT exit code)

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Successful execution
    Success = 0,
    /// Any error
    Error = 1,
    /// User interrupted (Ctrl+C) - standard SIGINT code
    Interrupted = 130,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Summarize a batch: success only when every command exited 0
    pub fn from_batch(failures: usize) -> Self {
        if failures == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error
        }
    }
}
