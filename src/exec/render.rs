//! Rendering captured output for display

use crate::output::formatters::{format_json, JsonFormatterOptions};

/// True when trimmed output is wrapped in a matching `{}` or `[]` pair
pub fn looks_structured(trimmed: &str) -> bool {
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

/// Pretty-print stdout when it looks like JSON, otherwise return it unchanged.
///
/// Never fails: anything that does not parse is shown raw.
pub fn render_stdout(stdout: &str, options: &JsonFormatterOptions) -> String {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || !looks_structured(trimmed) {
        return stdout.to_string();
    }

    match format_json(trimmed, options) {
        Ok(pretty) => pretty,
        Err(e) => {
            tracing::debug!(error = %e, "STDOUT looked like JSON but failed to parse; printing raw");
            stdout.to_string()
        }
    }
}
