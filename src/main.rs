use curlpad::context::Environment;
use curlpad::core;
use curlpad::signals::{self, InterruptSignal};
use curlpad::status::ExitStatus;

/// Entry point - catches Ctrl+C and calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    // Ctrl+C cancels instead of exiting so temp files are removed on the way out
    let interrupt = InterruptSignal::new();
    if let Err(e) = signals::install_handler(&interrupt) {
        eprintln!("Warning: failed to install Ctrl+C handler: {}", e);
    }

    let args: Vec<String> = std::env::args().collect();
    let env = Environment::init();

    core::run(args, env, interrupt)
}
