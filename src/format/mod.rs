//! Best-effort canonicalization of an embedded JSON payload
//!
//! The formatter looks for the first `-d`/`--data*`/`--json` flag followed by
//! a quoted `{...}` literal, pipes the literal through an external
//! canonicalizer (`jq -c .`) and splices the result back between the
//! original quotes. Any failure leaves the command untouched.
//!
//! Detection and canonicalization sit behind [`PayloadLocator`] and
//! [`Canonicalizer`] so either side can be replaced independently.
//!
//! The external tool gets [`FORMATTER_TIMEOUT`] per literal and is killed
//! when the run is cancelled.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::validate::ValidatedCommand;

/// Name of the external formatting tool
pub const FORMATTER_PROGRAM: &str = "jq";

/// Ceiling for one formatter invocation
pub const FORMATTER_TIMEOUT: Duration = Duration::from_secs(5);

static DATA_PAYLOAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<before>.*?\s(?:-d|--data|--data-raw|--data-binary|--data-ascii|--json)(?:=|\s*)['"])(?P<literal>\{[^}]*\})(?P<after>['"].*)$"#,
    )
    .expect("Invalid payload regex")
});

/// A command line split around an embedded literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSpan<'a> {
    /// Everything up to and including the opening quote
    pub before: &'a str,
    /// The object literal itself
    pub literal: &'a str,
    /// The closing quote and everything after it
    pub after: &'a str,
}

impl PayloadSpan<'_> {
    /// Quote character enclosing the literal
    pub fn quote(&self) -> Option<char> {
        self.before.chars().last()
    }

    /// Rebuild the line with a different literal
    pub fn splice(&self, literal: &str) -> String {
        format!("{}{}{}", self.before, literal, self.after)
    }
}

/// Finds the structured-data literal in a command line
pub trait PayloadLocator {
    fn locate<'a>(&self, line: &'a str) -> Option<PayloadSpan<'a>>;
}

/// Produces the canonical single-line form of a literal
#[allow(async_fn_in_trait)]
pub trait Canonicalizer {
    async fn canonicalize(&self, literal: &str) -> Option<String>;
}

/// Pattern-based locator: first data flag followed by a quoted flat object
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexLocator;

impl PayloadLocator for RegexLocator {
    fn locate<'a>(&self, line: &'a str) -> Option<PayloadSpan<'a>> {
        let caps = DATA_PAYLOAD_RE.captures(line)?;
        let span = PayloadSpan {
            before: caps.name("before")?.as_str(),
            literal: caps.name("literal")?.as_str(),
            after: caps.name("after")?.as_str(),
        };
        // Opening and closing quotes must agree
        if span.quote() != span.after.chars().next() {
            return None;
        }
        Some(span)
    }
}

/// Canonicalizer backed by `jq -c .`
#[derive(Debug, Clone)]
pub struct JqCanonicalizer {
    program: PathBuf,
    timeout: Duration,
    cancel: CancellationToken,
}

impl JqCanonicalizer {
    pub fn new(program: impl Into<PathBuf>, cancel: CancellationToken) -> Self {
        Self {
            program: program.into(),
            timeout: FORMATTER_TIMEOUT,
            cancel,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Locate `jq` on PATH
    pub fn detect(cancel: CancellationToken) -> Option<Self> {
        match which::which(FORMATTER_PROGRAM) {
            Ok(path) => {
                debug!(path = %path.display(), "Found JSON formatter");
                Some(Self::new(path, cancel))
            }
            Err(_) => {
                debug!("{} not found; skipping JSON formatting", FORMATTER_PROGRAM);
                None
            }
        }
    }
}

impl Canonicalizer for JqCanonicalizer {
    async fn canonicalize(&self, literal: &str) -> Option<String> {
        let mut child = Command::new(&self.program)
            .args(["-c", "."])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .ok()?;

        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(literal.as_bytes()).await.ok()?;
            }
            child.wait_with_output().await.ok()
        };

        let output = tokio::select! {
            output = run => output?,
            _ = tokio::time::sleep(self.timeout) => {
                debug!(timeout = ?self.timeout, "JSON formatter timed out; killing it");
                return None;
            }
            _ = self.cancel.cancelled() => {
                debug!("Cancelled while formatting JSON; killing formatter");
                return None;
            }
        };
        if !output.status.success() {
            debug!(code = ?output.status.code(), "jq failed to format JSON");
            return None;
        }

        let formatted = String::from_utf8(output.stdout).ok()?;
        Some(formatted.trim().to_string())
    }
}

/// Rewrites embedded payloads of validated commands
pub struct PayloadFormatter<'a, C> {
    locator: &'a dyn PayloadLocator,
    canonicalizer: Option<&'a C>,
}

impl<'a, C: Canonicalizer> PayloadFormatter<'a, C> {
    pub fn new(locator: &'a dyn PayloadLocator, canonicalizer: Option<&'a C>) -> Self {
        Self { locator, canonicalizer }
    }

    /// Format every command; commands without a usable payload pass through
    pub async fn format_all(&self, commands: Vec<ValidatedCommand>) -> Vec<ValidatedCommand> {
        let Some(canonicalizer) = self.canonicalizer else {
            return commands;
        };
        let mut formatted = Vec::with_capacity(commands.len());
        for command in commands {
            formatted.push(self.format_one(canonicalizer, command).await);
        }
        formatted
    }

    async fn format_one(&self, canonicalizer: &C, command: ValidatedCommand) -> ValidatedCommand {
        let Some(span) = self.locator.locate(command.as_str()) else {
            return command;
        };
        let Some(canonical) = canonicalizer.canonicalize(span.literal).await else {
            return command;
        };
        if !is_acceptable(&canonical, span.quote()) {
            debug!(output = %canonical, "Discarding malformed formatter output");
            return command;
        }
        if canonical == span.literal {
            return command;
        }

        let line = span.splice(&canonical);
        match shlex::split(&line) {
            Some(argv) => {
                debug!(before = command.as_str(), after = %line, "Formatted JSON in command");
                ValidatedCommand::rewritten(line, argv)
            }
            None => command,
        }
    }
}

/// Formatter output must be one line of valid JSON that cannot close the
/// surrounding quotes early
fn is_acceptable(canonical: &str, quote: Option<char>) -> bool {
    if canonical.is_empty() || canonical.contains('\n') || canonical.contains('\r') {
        return false;
    }
    if quote.is_some_and(|q| canonical.contains(q)) {
        return false;
    }
    serde_json::from_str::<serde_json::Value>(canonical).is_ok()
}

/// Format payloads with the default locator and `jq` when `available`
pub async fn format_payloads(
    commands: Vec<ValidatedCommand>,
    available: bool,
    cancel: CancellationToken,
) -> Vec<ValidatedCommand> {
    let jq = if available { JqCanonicalizer::detect(cancel) } else { None };
    let locator = RegexLocator;
    let formatter = PayloadFormatter::new(&locator, jq.as_ref());
    formatter.format_all(commands).await
}
