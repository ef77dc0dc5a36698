//! Command extraction from an edited buffer
//!
//! Reading happens once per run: the buffer is split into lines, each line
//! is classified on its own ([`classify`]), and the [`Coalescer`] folds
//! backslash-continued, flag-per-line and indented lines into one
//! [`CommandString`] per logical command, in buffer order.
//!
//! ```text
//! curl -X POST "https://api.example.com" \
//!   -H "Content-Type: application/json" \
//!   -d '{"key":"value"}'
//! ```
//!
//! becomes a single candidate:
//!
//! ```text
//! curl -X POST "https://api.example.com" -H "Content-Type: application/json" -d '{"key":"value"}'
//! ```

pub mod classify;
pub mod coalesce;

pub use classify::{classify, starts_with_program, ClassifiedLine, LineKind};
pub use coalesce::{coalesce, coalesce_str, Coalescer, CommandString};

use std::path::Path;

use tracing::debug;

use crate::errors::{CurlpadError, Result};

/// Extract uncommented curl commands from a buffer file
pub fn extract_commands(path: &Path) -> Result<Vec<CommandString>> {
    let buffer = std::fs::read_to_string(path).map_err(|source| CurlpadError::BufferRead {
        path: path.to_path_buf(),
        source,
    })?;

    let commands = coalesce_str(&buffer);
    debug!(count = commands.len(), path = %path.display(), "Extracted curl commands");
    Ok(commands)
}
