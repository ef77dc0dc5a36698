//! Scratch buffer handed to the editor

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::context::RunContext;
use crate::errors::{CurlpadError, Result};
use crate::PERMITTED_PROGRAM;

const HEADER: &str = "\
#!/bin/sh
# curlpad - scratchpad for curl.
# Lines starting with `curl` are run; `#` lines are ignored.
# End a line with `\\` or indent the next one to continue a command.
# curl -X POST \"https://api.example.com\" \\
#   -H \"Content-Type: application/json\" \\
#   -d '{\"key\":\"value\"}'
";

/// Words offered by the editor's dictionary completion
pub const COMPLETION_WORDS: &[&str] = &[
    "curl", "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS",
    "-X", "--request", "-H", "--header", "Content-Type:", "Accept:", "Authorization:",
    "application/json", "application/xml", "text/plain",
    "-d", "--data", "--data-raw", "--data-binary", "--data-urlencode", "--json",
    "--url", "-i", "--include", "-v", "--verbose", "-s", "--silent", "-L", "--location",
    "-k", "--insecure", "--connect-timeout", "--max-time", "-u", "--user",
    "-x", "--proxy", "--cert", "--key", "--cacert", "-A", "--user-agent",
    "-b", "--cookie", "-e", "--referer", "-f", "--fail", "-I", "--head",
    "--compressed", "https://", "http://", "localhost", "127.0.0.1",
];

/// Buffer contents: commented example followed by a line ready for input
pub fn render_template(url: Option<&str>) -> String {
    let mut template = String::from(HEADER);
    template.push_str(PERMITTED_PROGRAM);
    template.push(' ');
    if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
        match shlex::try_quote(url) {
            Ok(quoted) => template.push_str(&quoted),
            Err(_) => debug!(url, "URL cannot be quoted, leaving template blank"),
        }
    }
    template.push('\n');
    template
}

/// Line number of the editable command line (1-based)
pub fn input_line() -> usize {
    HEADER.lines().count() + 1
}

/// Create the template buffer, owned by `ctx` until the run ends
pub fn create_template(ctx: &mut RunContext, url: Option<&str>) -> Result<PathBuf> {
    let content = render_template(url);
    write_temp(ctx, ".sh", &content)
}

/// Create the completion dictionary, one word per line
pub fn create_dictionary(ctx: &mut RunContext) -> Result<PathBuf> {
    let mut content = COMPLETION_WORDS.join("\n");
    content.push('\n');
    write_temp(ctx, ".dict", &content)
}

fn write_temp(ctx: &mut RunContext, suffix: &str, content: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("curlpad-")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| CurlpadError::Editor(format!("Failed to create temporary file: {}", e)))?;

    file.write_all(content.as_bytes())?;
    file.flush()?;

    let path = ctx.track(file.into_temp_path());
    debug!(path = %path.display(), bytes = content.len(), "Created temporary file");
    Ok(path)
}
