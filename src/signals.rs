//! Interrupt/signal handling for graceful shutdown
//!
//! Ctrl+C cancels a [`CancellationToken`] instead of flipping a process-wide
//! flag. The batch loop checks the token before spawning each command and the
//! executor races it against the running child, so a spawned process is
//! always killed or reaped.

use tokio_util::sync::CancellationToken;

use crate::status::ExitStatus;

/// Handle shared between the Ctrl+C handler and the run loop
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    token: CancellationToken,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to select on while waiting for work
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Check if the application was interrupted (Ctrl+C pressed)
    #[inline]
    pub fn was_interrupted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Record an interrupt. Returns `true` for the first one.
    pub fn trigger(&self) -> bool {
        let first = !self.token.is_cancelled();
        self.token.cancel();
        first
    }
}

/// Install the process Ctrl+C handler.
///
/// The first interrupt cancels the token so destructors still run and temp
/// files get removed. A second interrupt exits immediately.
pub fn install_handler(signal: &InterruptSignal) -> Result<(), ctrlc::Error> {
    let signal = signal.clone();
    ctrlc::set_handler(move || {
        // Print newline to clean up interrupted line
        eprintln!("\nInterrupted");

        if !signal.trigger() {
            std::process::exit(ExitStatus::Interrupted as i32);
        }
    })
}
