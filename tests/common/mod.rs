//! Common test utilities for curlpad integration tests
//!
//! This module provides shared test infrastructure including:
//! - An isolated environment (config dir, buffers, a private `PATH`)
//! - Stand-in `curl`, `jq` and editor scripts
//! - CLI invocation helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated environment for one curlpad invocation
pub struct TestEnv {
    root: TempDir,
    env_vars: HashMap<String, String>,
    inherit_path: bool,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Create a new environment with empty config and bin directories
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(root.path().join("config")).expect("Failed to create config dir");
        std::fs::create_dir_all(root.path().join("bin")).expect("Failed to create bin dir");
        Self {
            root,
            env_vars: HashMap::new(),
            inherit_path: true,
        }
    }

    /// Only the private bin directory is searched for programs
    pub fn isolated_path(&mut self) -> &mut Self {
        self.inherit_path = false;
        self
    }

    /// Set an environment variable
    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    /// Path inside the environment's scratch directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write a command buffer and return its path
    pub fn write_buffer(&self, content: &str) -> PathBuf {
        let path = self.path("commands.sh");
        std::fs::write(&path, content).expect("Failed to write buffer");
        path
    }

    /// Write `config.toml`
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_dir().join("config.toml"), content).expect("Failed to write config");
    }

    /// Install an executable shell script into the private bin directory
    #[cfg(unix)]
    pub fn install_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin_dir().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod script");
        path
    }

    /// Stand-in `curl` that records each invocation and prints its arguments as JSON
    #[cfg(unix)]
    pub fn install_fake_curl(&self) -> PathBuf {
        let log = self.path("curl.log");
        self.install_script(
            "curl",
            &format!(
                r#"printf '%s\n' "$*" >> '{log}'
printf '{{"argc": %d, "first": "%s"}}' "$#" "$1""#,
                log = log.display()
            ),
        )
    }

    /// Lines recorded by the fake `curl`, one per invocation
    pub fn curl_invocations(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("curl.log"))
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Stand-in `jq -c .` that strips spaces
    #[cfg(unix)]
    pub fn install_fake_jq(&self) -> PathBuf {
        self.install_script("jq", "exec tr -d ' \\n'")
    }

    /// `PATH` seen by curlpad
    pub fn path_var(&self) -> OsString {
        let mut paths = vec![self.bin_dir()];
        if self.inherit_path {
            if let Some(existing) = std::env::var_os("PATH") {
                paths.extend(std::env::split_paths(&existing));
            }
        }
        std::env::join_paths(paths).expect("Failed to join PATH")
    }

    /// Command for the curlpad binary with this environment applied.
    /// Stdin is never a terminal.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_curlpad"));
        cmd.env("CURLPAD_CONFIG_DIR", self.config_dir())
            .env("PATH", self.path_var())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("CURLPAD_DEBUG")
            .env_remove("VISUAL")
            .env_remove("EDITOR")
            .write_stdin("")
            .timeout(std::time::Duration::from_secs(30));
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run curlpad on a buffer file
    pub fn run_buffer(&self, buffer: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().arg("--file").arg(buffer).args(args).assert()
    }
}

/// Strip ANSI color codes from a string
pub fn strip_colors(s: &str) -> String {
    let re = regex::Regex::new(r"\x1b\[[\d;]*m").unwrap();
    re.replace_all(s, "").to_string()
}

/// Captured stdout of an assertion as text
pub fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    strip_colors(&String::from_utf8_lossy(&assert.get_output().stdout))
}

/// Captured stderr of an assertion as text
pub fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
    strip_colors(&String::from_utf8_lossy(&assert.get_output().stderr))
}
