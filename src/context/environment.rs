//! Environment struct (tty detection, colors, program name)
//!
//! `program_name` is the basename curlpad was invoked as; shell completions
//! are generated for that name.

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stdin_isatty: bool,
    pub stdout_isatty: bool,
    pub stderr_isatty: bool,
    pub colors: bool,
    pub program_name: String,
}

impl Environment {
    /// Initialize the environment from the current process
    pub fn init() -> Self {
        Self::default()
    }

    /// Environment with every stream redirected and colors off
    pub fn detached() -> Self {
        Self {
            stdin_isatty: false,
            stdout_isatty: false,
            stderr_isatty: false,
            colors: false,
            program_name: "curlpad".to_string(),
        }
    }

    /// Wrap `text` with the given styling function when colors are enabled
    pub fn paint(&self, text: &str, style: fn(&str) -> String) -> String {
        if self.colors {
            style(text)
        } else {
            text.to_string()
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            stdin_isatty: atty::is(atty::Stream::Stdin),
            stdout_isatty: atty::is(atty::Stream::Stdout),
            stderr_isatty: atty::is(atty::Stream::Stderr),
            colors: detect_color_support(),
            program_name: "curlpad".to_string(),
        }
    }
}

/// Detect whether colored output should be used
fn detect_color_support() -> bool {
    if !atty::is(atty::Stream::Stdout) {
        return false;
    }

    // Check for NO_COLOR environment variable
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}
