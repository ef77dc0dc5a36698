//! Platform process launchers
//!
//! A launcher turns a validated command line into a process description.
//! It never goes through `sh -c` / `cmd /c`: the argument vector produced by
//! word splitting is handed to the OS as-is. The launcher is chosen once at
//! startup with [`platform_launcher`].

use std::path::PathBuf;

use tokio::process::Command;

use crate::errors::{CurlpadError, Result};
use crate::PERMITTED_PROGRAM;

/// Capability to split and spawn commands on the current platform
pub trait ProcessLauncher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Split a command line into an argument vector
    fn tokenize(&self, line: &str) -> Result<Vec<String>> {
        let argv = shlex::split(line)
            .ok_or_else(|| CurlpadError::Tokenize(format!("unbalanced quotes in: {}", line)))?;
        if argv.is_empty() {
            return Err(CurlpadError::Tokenize("empty command".to_string()));
        }
        Ok(argv)
    }

    /// Build the process for `argv` (program first)
    fn command(&self, argv: &[String]) -> Result<Command>;
}

/// POSIX launcher: spawn the argument vector directly
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectLauncher;

impl ProcessLauncher for DirectLauncher {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn command(&self, argv: &[String]) -> Result<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CurlpadError::Tokenize("empty command".to_string()))?;
        let mut command = Command::new(program);
        command.args(args);
        Ok(command)
    }
}

/// Windows launcher: resolves `curl.exe` and keeps the child off a new console
#[derive(Debug, Clone)]
pub struct WindowsLauncher {
    program: PathBuf,
}

impl WindowsLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Prefer `curl.exe` on PATH, then `curl`, then the bare name
    pub fn detect() -> Self {
        let program = which::which(format!("{}.exe", PERMITTED_PROGRAM))
            .or_else(|_| which::which(PERMITTED_PROGRAM))
            .unwrap_or_else(|_| PathBuf::from(format!("{}.exe", PERMITTED_PROGRAM)));
        Self::new(program)
    }
}

impl ProcessLauncher for WindowsLauncher {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn command(&self, argv: &[String]) -> Result<Command> {
        let (first, args) = argv
            .split_first()
            .ok_or_else(|| CurlpadError::Tokenize("empty command".to_string()))?;

        let mut command = if first.eq_ignore_ascii_case(PERMITTED_PROGRAM) {
            Command::new(&self.program)
        } else {
            Command::new(first)
        };
        command.args(args);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        Ok(command)
    }
}

/// Launcher for the platform we were compiled for
pub fn platform_launcher() -> Box<dyn ProcessLauncher> {
    if cfg!(windows) {
        Box::new(WindowsLauncher::detect())
    } else {
        Box::new(DirectLauncher)
    }
}
