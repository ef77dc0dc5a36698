//! Command execution
//!
//! - [`launcher`] - platform-specific process construction (no shell)
//! - [`runner`] - spawning, timeout, cancellation, captured output
//! - [`render`] - best-effort pretty printing of captured stdout

pub mod launcher;
pub mod render;
pub mod runner;

pub use launcher::{platform_launcher, DirectLauncher, ProcessLauncher, WindowsLauncher};
pub use render::{looks_structured, render_stdout};
pub use runner::{ExecutionResult, Executor, DEFAULT_TIMEOUT};
