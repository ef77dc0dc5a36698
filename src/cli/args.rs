//! CLI argument definitions using clap
//!
//! This module defines all command-line arguments for curlpad.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Compose curl commands in your editor, then validate and run them
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "curlpad", version, about, long_about = None)]
pub struct Args {
    // =========================================================================
    // BUFFER
    // =========================================================================

    /// URL to pre-populate in the template buffer
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Read commands from an existing file instead of opening the editor
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Editor command (overrides config, $VISUAL and $EDITOR)
    #[arg(long = "editor", value_name = "CMD")]
    pub editor: Option<String>,

    // =========================================================================
    // EXECUTION
    // =========================================================================

    /// Run without asking for confirmation
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Print the validated commands and exit without running them
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Leave JSON payloads exactly as written
    #[arg(long = "no-format", action = ArgAction::SetTrue)]
    pub no_format: bool,

    /// Per-command timeout in seconds (default: 300)
    #[arg(long = "timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Force disable colors in output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Output format for diagnostic logging: json (JSON Lines) or text (default)
    #[arg(long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    // =========================================================================
    // TROUBLESHOOTING
    // =========================================================================

    /// Show traceback on error
    #[arg(long = "traceback", action = ArgAction::SetTrue)]
    pub traceback: bool,

    /// Debug mode (implies --traceback)
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,

    // =========================================================================
    // GENERATION (hidden)
    // =========================================================================

    /// Generate shell completions for the specified shell
    #[arg(long = "generate-completions", value_name = "SHELL", value_enum, hide = true)]
    pub generate_completions: Option<Shell>,

    /// Generate man page to stdout
    #[arg(long = "generate-manpage", action = ArgAction::SetTrue, hide = true)]
    pub generate_manpage: bool,
}

/// Environment variable that turns on debug diagnostics
pub const DEBUG_ENV: &str = "CURLPAD_DEBUG";

impl Args {
    /// `--debug` or a truthy `CURLPAD_DEBUG`
    pub fn debug_enabled(&self) -> bool {
        self.debug
            || std::env::var(DEBUG_ENV)
                .map(|v| is_truthy(&v))
                .unwrap_or(false)
    }

    /// Whether errors print their full debug representation
    pub fn show_traceback(&self) -> bool {
        self.traceback || self.debug_enabled()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Shell types for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Log format for diagnostic output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
