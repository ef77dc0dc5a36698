//! Error types for curlpad

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for curlpad
#[derive(Error, Debug)]
pub enum CurlpadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read buffer {}: {source}", path.display())]
    BufferRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not split command into arguments: {0}")]
    Tokenize(String),

    #[error("Invalid curl command: {0}")]
    Rejected(#[from] Rejection),

    #[error("{0} is not installed. Please install {0} first.")]
    MissingProgram(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Confirmation prompt failed: {0}")]
    Prompt(String),

    #[error("Failed to execute command: {0}")]
    Spawn(String),

    #[error("Command timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Cancelled")]
    Cancelled,
}

/// Why the validator refused a candidate command.
///
/// Each variant names the rule that fired so the user can see what to fix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("command is empty")]
    Empty,

    #[error("command contains an embedded line break")]
    EmbeddedNewline,

    #[error("shell metacharacter `{pattern}` is not allowed")]
    Metacharacter { pattern: &'static str },

    #[error("unbalanced quotes")]
    UnbalancedQuotes,

    #[error("only `curl` may be run, found `{found}`")]
    WrongProgram { found: String },

    #[error("flag `{flag}` is blocked")]
    BlockedFlag { flag: String },

    #[error("flag `{flag}` is not in the list of allowed flags")]
    UnknownFlag { flag: String },

    #[error("`{flag} {value}` would read a local file")]
    LocalFile { flag: String, value: String },

    #[error("argument `{token}` contains a command substitution")]
    Substitution { token: String },
}

pub type Result<T> = std::result::Result<T, CurlpadError>;
