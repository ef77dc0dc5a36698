//! curlpad library interface
//!
//! Compose curl commands in an editor buffer, then extract, validate and run
//! them without ever handing a line to a shell.
//!
//! # Module Organization
//!
//! - [`extract`] - Line classification and command coalescing
//! - [`validate`] - Allowlist validation of candidate commands
//! - [`format`] - Best-effort JSON payload formatting
//! - [`exec`] - Direct process execution with timeout and cancellation
//! - [`editor`] - Template buffer and editor launch
//! - [`signals`] - Interrupt handling (InterruptSignal, install_handler)
//! - [`errors`] - Error types (CurlpadError, Rejection, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod editor;
pub mod errors;
pub mod exec;
pub mod extract;
pub mod format;
pub mod output;
pub mod signals;
pub mod status;
pub mod validate;

/// The only program curlpad will ever run
pub const PERMITTED_PROGRAM: &str = "curl";
