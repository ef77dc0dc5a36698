//! Fixed flag tables for the permitted program
//!
//! Unknown flags are rejected. The blocklist is consulted first so that a
//! dangerous flag always gets the more specific error message.

/// Flags reviewed as safe for request composition
pub const ALLOWED_FLAGS: &[&str] = &[
    // Method, URL, headers
    "-X", "--request",
    "-H", "--header",
    "--url",
    "-G", "--get",
    "-I", "--head",
    "-A", "--user-agent",
    "-e", "--referer",
    "-b", "--cookie",
    // Request bodies
    "-d", "--data",
    "--data-raw",
    "--data-binary",
    "--data-ascii",
    "--data-urlencode",
    "--json",
    "-F", "--form",
    // Output verbosity
    "-i", "--include",
    "-s", "--silent",
    "-S", "--show-error",
    "-v", "--verbose",
    "--no-progress-meter",
    "-f", "--fail",
    "--fail-with-body",
    "--compressed",
    // Redirects, timeouts, retries
    "-L", "--location",
    "--max-redirs",
    "-m", "--max-time",
    "--connect-timeout",
    "--retry",
    "--retry-delay",
    "--retry-max-time",
    // Authentication
    "-u", "--user",
    "--basic",
    "--digest",
    "--negotiate",
    "--ntlm",
    "--oauth2-bearer",
    // TLS
    "-k", "--insecure",
    "-E", "--cert",
    "--key",
    "--cacert",
    "--capath",
    // Connection
    "-x", "--proxy",
    "-4", "--ipv4",
    "-6", "--ipv6",
    "--http1.0",
    "--http1.1",
    "--http2",
    "--http3",
    "-g", "--globoff",
    "--path-as-is",
];

/// Flags that are never accepted, even if added to the allowlist by mistake
pub const BLOCKED_FLAGS: &[&str] = &[
    // Reads arbitrary files as curl configuration
    "-K", "--config",
    // Format strings and diagnostic dumps that can echo secrets
    "-w", "--write-out",
    "--libcurl",
    "--trace",
    "--trace-ascii",
    "--trace-config",
    "--stderr",
    // Writes to the local filesystem
    "-o", "--output",
    "--output-dir",
    "--create-dirs",
    "-O", "--remote-name",
    "--remote-name-all",
    "-J", "--remote-header-name",
    "-D", "--dump-header",
    "-c", "--cookie-jar",
    "--etag-save",
    "--hsts",
    "--alt-svc",
    // Uploads local files
    "-T", "--upload-file",
    // Alternate credential sources
    "--netrc-file",
    "--proxy-header",
];

/// Allowed flags whose value can name a local file for curl to read and send
pub const FILE_REFERENCE_FLAGS: &[&str] = &[
    "-d", "--data",
    "--data-binary",
    "--data-ascii",
    "--data-urlencode",
    "--json",
    "-F", "--form",
    "-H", "--header",
    "-b", "--cookie",
];

pub fn is_allowed(flag: &str) -> bool {
    ALLOWED_FLAGS.contains(&flag)
}

pub fn is_blocked(flag: &str) -> bool {
    BLOCKED_FLAGS.contains(&flag)
}

pub fn takes_file_reference(flag: &str) -> bool {
    FILE_REFERENCE_FLAGS.contains(&flag)
}

/// Whether `value` makes `flag` read a local file instead of sending it literally.
///
/// Mirrors curl's own syntax: `@file` for bodies and headers, `name@file` for
/// `--data-urlencode`, `name=@file` or `name=<file` for form parts, and a
/// cookie argument without `=` is a cookie file.
pub fn reads_local_file(flag: &str, value: &str) -> bool {
    match flag {
        "--data-urlencode" => value.split('=').next().is_some_and(|name| name.contains('@')),
        "-F" | "--form" => value
            .split_once('=')
            .is_some_and(|(_, part)| part.starts_with('@') || part.starts_with('<')),
        "-b" | "--cookie" => !value.is_empty() && !value.contains('='),
        _ => value.starts_with('@'),
    }
}

/// Flag name of a token: everything before the first `=`
pub fn flag_name(token: &str) -> &str {
    token.split_once('=').map_or(token, |(name, _)| name)
}
