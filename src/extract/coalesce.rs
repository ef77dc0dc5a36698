//! Folding continuation lines into single logical commands

use std::fmt;

use tracing::debug;

use super::classify::{ClassifiedLine, LineKind};

/// One complete, single-line candidate invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandString(String);

impl CommandString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CommandString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommandString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// State machine that turns buffer lines into [`CommandString`]s.
///
/// Idle while `current` is empty; building otherwise.
#[derive(Debug, Default)]
pub struct Coalescer {
    current: Vec<String>,
    output: Vec<CommandString>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_building(&self) -> bool {
        !self.current.is_empty()
    }

    /// Feed one raw buffer line (trailing newline already removed)
    pub fn push(&mut self, raw: &str) {
        let line = ClassifiedLine::new(raw);
        if line.kind.is_ignored() {
            return;
        }

        let text = raw.trim_end();

        if !self.is_building() {
            if line.kind != LineKind::CommandStart {
                debug!(line = raw, "Skipping non-curl leading line");
                return;
            }
            match strip_backslash(text) {
                Some(head) => self.current.push(head.to_string()),
                None => {
                    self.current.push(text.to_string());
                    self.flush();
                }
            }
            return;
        }

        let (fragment, continues) = if let Some(head) = strip_backslash(text) {
            (head, true)
        } else if line.content().starts_with('-') || line.is_indented() {
            (text, true)
        } else {
            (text, false)
        };

        self.current.push(fragment.to_string());
        if !continues {
            self.flush();
        }
    }

    /// Join the in-progress fragments and emit them as one command
    fn flush(&mut self) {
        let joined = self
            .current
            .drain(..)
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !joined.is_empty() {
            self.output.push(CommandString(joined));
        }
    }

    /// Flush whatever is still open and return every command in buffer order
    pub fn finish(mut self) -> Vec<CommandString> {
        self.flush();
        self.output
    }
}

/// Remove a single trailing backslash continuation marker
fn strip_backslash(text: &str) -> Option<&str> {
    text.strip_suffix('\\').map(str::trim_end)
}

/// Coalesce an iterator of buffer lines
pub fn coalesce<'a, I>(lines: I) -> Vec<CommandString>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut coalescer = Coalescer::new();
    for line in lines {
        coalescer.push(line);
    }
    coalescer.finish()
}

/// Coalesce a whole buffer
pub fn coalesce_str(buffer: &str) -> Vec<CommandString> {
    coalesce(buffer.lines())
}
