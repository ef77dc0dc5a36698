//! Per-process and per-run context
//!
//! - [`Environment`] describes the terminal we are attached to.
//! - [`RunContext`] is built once at startup and threaded through the
//!   pipeline: the debug flag, the interrupt token, and every temporary
//!   resource that must be released on exit.

mod environment;

pub use environment::Environment;

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::signals::InterruptSignal;

/// State owned by a single curlpad invocation
#[derive(Debug)]
pub struct RunContext {
    pub debug: bool,
    interrupt: InterruptSignal,
    resources: Vec<TempPath>,
}

impl RunContext {
    pub fn new(debug: bool, interrupt: InterruptSignal) -> Self {
        Self {
            debug,
            interrupt,
            resources: Vec::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.interrupt.token()
    }

    pub fn was_interrupted(&self) -> bool {
        self.interrupt.was_interrupted()
    }

    /// Take ownership of a temporary file; it is deleted by [`cleanup`](Self::cleanup)
    pub fn track(&mut self, path: TempPath) -> PathBuf {
        let owned = path.to_path_buf();
        debug!(path = %owned.display(), total = self.resources.len() + 1, "Tracking temp file");
        self.resources.push(path);
        owned
    }

    pub fn tracked(&self) -> impl Iterator<Item = &Path> {
        self.resources.iter().map(|p| &**p)
    }

    /// Remove every tracked temp file. Errors are logged and otherwise ignored.
    pub fn cleanup(&mut self) {
        if self.resources.is_empty() {
            return;
        }
        debug!(count = self.resources.len(), "Removing temp files");
        for path in self.resources.drain(..) {
            let shown = path.to_path_buf();
            if let Err(e) = path.close() {
                debug!(path = %shown.display(), error = %e, "Failed to remove temp file");
            }
        }
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        self.cleanup();
    }
}
