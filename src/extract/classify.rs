//! Per-line lexical classification of the edited buffer

use crate::PERMITTED_PROGRAM;

/// What a single physical line of the buffer looks like on its own.
///
/// `Continuation` only means "not blank, not a comment, not a command start";
/// whether it actually continues a command is decided by the coalescer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    CommandStart,
    Continuation,
}

impl LineKind {
    /// Blank and comment lines never reach the coalescer
    pub fn is_ignored(self) -> bool {
        matches!(self, LineKind::Blank | LineKind::Comment)
    }
}

/// A raw buffer line together with its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub raw: &'a str,
    pub kind: LineKind,
}

impl<'a> ClassifiedLine<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw, kind: classify(raw) }
    }

    /// Line content without its indentation
    pub fn content(&self) -> &'a str {
        self.raw.trim_start()
    }

    /// Whether the line carries leading whitespace
    pub fn is_indented(&self) -> bool {
        self.content().len() != self.raw.len()
    }
}

/// Classify one line without looking at its neighbours
pub fn classify(raw: &str) -> LineKind {
    let content = raw.trim_start();
    if content.trim_end().is_empty() {
        LineKind::Blank
    } else if content.starts_with('#') {
        LineKind::Comment
    } else if starts_with_program(content) {
        LineKind::CommandStart
    } else {
        LineKind::Continuation
    }
}

/// True when `content` begins with the permitted program name as a whole word.
///
/// `curl`, `curl -X GET` and a bare `curl \` qualify; `curlx` does not.
pub fn starts_with_program(content: &str) -> bool {
    let Some(rest) = content.strip_prefix(PERMITTED_PROGRAM) else {
        return false;
    };
    match rest.chars().next() {
        None => true,
        Some(c) if c.is_whitespace() => true,
        Some('\\') => rest.trim_end() == "\\",
        Some(_) => false,
    }
}
