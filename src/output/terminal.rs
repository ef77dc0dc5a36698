//! Terminal colors and section rules

pub mod colors {
    pub const GREY: u8 = 102;      // #7D7D7D - Rules, secondary
    pub const AQUA: u8 = 109;      // #7A9EB5 - Info
    pub const ORANGE: u8 = 208;    // #F2913D - Warnings
    pub const RED: u8 = 167;       // #E34F45 - Errors, STDERR
    pub const GREEN: u8 = 71;      // #63C27A - Success, STDOUT
}

/// ANSI reset
pub const RESET: &str = "\x1b[0m";

/// Width of the horizontal rule drawn around command listings
pub const RULE_WIDTH: usize = 50;

/// Generate foreground color escape code
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Generate bold foreground color escape code
#[inline]
pub fn bold_fg(color: u8) -> String {
    format!("\x1b[1;38;5;{}m", color)
}

/// Colorize text with a foreground color
#[inline]
pub fn colorize(text: &str, color: u8) -> String {
    format!("{}{}{}", fg(color), text, RESET)
}

/// Colorize text with bold foreground color
#[inline]
pub fn bold(text: &str, color: u8) -> String {
    format!("{}{}{}", bold_fg(color), text, RESET)
}

/// Success message (green)
#[inline]
pub fn success(text: &str) -> String {
    bold(text, colors::GREEN)
}

/// Error message (red)
#[inline]
pub fn error(text: &str) -> String {
    bold(text, colors::RED)
}

/// Warning message (orange)
#[inline]
pub fn warning(text: &str) -> String {
    bold(text, colors::ORANGE)
}

/// Info message (aqua)
#[inline]
pub fn info(text: &str) -> String {
    colorize(text, colors::AQUA)
}

/// Secondary/muted text (grey)
#[inline]
pub fn muted(text: &str) -> String {
    colorize(text, colors::GREY)
}

/// Plain horizontal rule
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}
