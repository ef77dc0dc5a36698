//! Console output (colors, formatting, sections)

pub mod formatters;
pub mod terminal;

pub use terminal::{bold, colorize, colors, error, info, muted, rule, success, warning, RESET};
