//! Allowlist-based validation of candidate commands
//!
//! A candidate is accepted only when it is a plain `curl` invocation whose
//! every flag is known to be safe. Checks run in a fixed order and the first
//! failure wins:
//!
//! 1. non-empty
//! 2. no embedded line breaks
//! 3. no shell metacharacters anywhere in the string
//! 4. POSIX word splitting succeeds (quotes balanced)
//! 5. first word is exactly `curl`
//! 6. every flag is allowlisted and not blocklisted; positional arguments
//!    carry no command substitution
//! 7. body, header and cookie values do not point curl at a local file

pub mod flags;

use std::fmt;

use tracing::debug;

use crate::errors::Rejection;
use crate::PERMITTED_PROGRAM;

/// Substrings rejected before tokenization. Longer patterns come first so
/// the reported pattern is the most specific one.
pub const SHELL_METACHARACTERS: &[&str] = &["&&", "||", "$(", "${", ";", "|", "$", "`", ">", "<"];

/// Command-substitution openers rejected inside positional arguments
pub const SUBSTITUTIONS: &[&str] = &["`", "$(", "${"];

/// A candidate that passed every check, paired with its argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    line: String,
    argv: Vec<String>,
}

impl ValidatedCommand {
    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Flag names used by the command, in order
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.argv
            .iter()
            .skip(1)
            .filter(|t| t.starts_with('-'))
            .map(|t| flags::flag_name(t))
    }

    /// Replace the command line after cosmetic rewriting.
    ///
    /// The argument vector is recomputed by word splitting only; the result
    /// is validated again right before execution.
    pub(crate) fn rewritten(line: String, argv: Vec<String>) -> Self {
        Self { line, argv }
    }
}

impl fmt::Display for ValidatedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Validate one candidate command string
pub fn validate(candidate: &str) -> Result<ValidatedCommand, Rejection> {
    let line = candidate.trim();
    if line.is_empty() {
        return Err(Rejection::Empty);
    }

    if line.contains('\n') || line.contains('\r') {
        return Err(Rejection::EmbeddedNewline);
    }

    if let Some(pattern) = SHELL_METACHARACTERS.iter().copied().find(|p| line.contains(*p)) {
        return Err(Rejection::Metacharacter { pattern });
    }

    let argv = shlex::split(line).ok_or(Rejection::UnbalancedQuotes)?;

    match argv.first() {
        Some(first) if first == PERMITTED_PROGRAM => {}
        Some(first) => {
            return Err(Rejection::WrongProgram { found: first.clone() });
        }
        None => return Err(Rejection::Empty),
    }

    // Flag still waiting for its value in the next token
    let mut pending: Option<&str> = None;
    for token in &argv[1..] {
        if token.starts_with('-') {
            check_flag(token)?;
            pending = match token.split_once('=') {
                Some((name, value)) => {
                    check_file_reference(name, value)?;
                    None
                }
                None => Some(token.as_str()).filter(|name| flags::takes_file_reference(name)),
            };
        } else {
            check_positional(token)?;
            if let Some(flag) = pending.take() {
                check_file_reference(flag, token)?;
            }
        }
    }

    debug!(command = line, args = argv.len(), "Command validated");
    Ok(ValidatedCommand {
        line: line.to_string(),
        argv,
    })
}

/// Check a single flag token against the tables
fn check_flag(token: &str) -> Result<(), Rejection> {
    let name = flags::flag_name(token);

    if flags::is_blocked(name) {
        return Err(Rejection::BlockedFlag { flag: name.to_string() });
    }
    if !flags::is_allowed(name) {
        return Err(Rejection::UnknownFlag { flag: name.to_string() });
    }
    Ok(())
}

fn check_file_reference(flag: &str, value: &str) -> Result<(), Rejection> {
    if flags::takes_file_reference(flag) && flags::reads_local_file(flag, value) {
        return Err(Rejection::LocalFile {
            flag: flag.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Positional arguments must not open a command substitution.
///
/// The metacharacter screen already covers the whole line; this catches
/// substitutions that only appear once quotes are removed.
fn check_positional(token: &str) -> Result<(), Rejection> {
    if SUBSTITUTIONS.iter().any(|s| token.contains(*s)) {
        return Err(Rejection::Substitution { token: token.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(cmd: &str) -> Rejection {
        validate(cmd).unwrap_err()
    }

    #[test]
    fn test_accepts_simple_get() {
        let cmd = validate(r#"curl -X GET "https://api.example.com/health""#).unwrap();
        assert_eq!(cmd.argv(), ["curl", "-X", "GET", "https://api.example.com/health"]);
        assert_eq!(cmd.flags().collect::<Vec<_>>(), vec!["-X"]);
    }

    #[test]
    fn test_accepts_json_post() {
        let cmd = validate(r#"curl -X POST "https://x" -d '{"a":1}'"#).unwrap();
        assert_eq!(cmd.argv().last().unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let cmd = validate("   curl https://example.com  ").unwrap();
        assert_eq!(cmd.as_str(), "curl https://example.com");
    }

    #[test]
    fn test_empty() {
        assert_eq!(rejection(""), Rejection::Empty);
        assert_eq!(rejection("  \t "), Rejection::Empty);
    }

    #[test]
    fn test_embedded_newline() {
        assert_eq!(rejection("curl https://x\nrm -rf /"), Rejection::EmbeddedNewline);
        assert_eq!(rejection("curl https://x\r-s"), Rejection::EmbeddedNewline);
    }

    #[test]
    fn test_metacharacters_always_rejected() {
        let cases = [
            (r#"curl "https://x"; rm -rf /"#, ";"),
            ("curl https://x | sh", "|"),
            ("curl https://x || true", "||"),
            ("curl https://x && true", "&&"),
            ("curl `whoami`", "`"),
            ("curl $(whoami)", "$("),
            ("curl ${HOME}", "${"),
            ("curl $HOME", "$"),
            ("curl https://x > out", ">"),
            ("curl https://x < in", "<"),
        ];
        for (cmd, pattern) in cases {
            assert_eq!(rejection(cmd), Rejection::Metacharacter { pattern }, "{cmd}");
        }
    }

    #[test]
    fn test_metacharacter_inside_quotes_still_rejected() {
        assert!(matches!(
            rejection(r#"curl -s -L -d 'a;b' https://x"#),
            Rejection::Metacharacter { pattern: ";" }
        ));
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert_eq!(rejection(r#"curl -d '{"a":1} https://x"#), Rejection::UnbalancedQuotes);
    }

    #[test]
    fn test_wrong_program() {
        assert_eq!(
            rejection("/usr/bin/curl https://x"),
            Rejection::WrongProgram { found: "/usr/bin/curl".into() }
        );
        assert_eq!(
            rejection("wget https://x"),
            Rejection::WrongProgram { found: "wget".into() }
        );
        assert_eq!(
            rejection("curlx https://x"),
            Rejection::WrongProgram { found: "curlx".into() }
        );
    }

    #[test]
    fn test_blocked_flag() {
        assert_eq!(
            rejection(r#"curl -X POST "https://x" --data '{"a":1}' -K /etc/passwd"#),
            Rejection::BlockedFlag { flag: "-K".into() }
        );
        assert_eq!(
            rejection("curl --config=/tmp/rc https://x"),
            Rejection::BlockedFlag { flag: "--config".into() }
        );
        assert_eq!(
            rejection("curl -o /tmp/x https://x"),
            Rejection::BlockedFlag { flag: "-o".into() }
        );
    }

    #[test]
    fn test_positional_substitution() {
        assert!(check_positional("https://example.com/a?b=c").is_ok());
        assert_eq!(
            check_positional("$(id)"),
            Err(Rejection::Substitution { token: "$(id)".into() })
        );
        assert!(check_positional("a`b").is_err());
        assert!(check_positional("${X}").is_err());
    }

    #[test]
    fn test_unknown_flag() {
        assert_eq!(
            rejection("curl --doh-url https://evil https://x"),
            Rejection::UnknownFlag { flag: "--doh-url".into() }
        );
    }

    #[test]
    fn test_flag_value_form() {
        let cmd = validate("curl --max-time=5 --data=a=b https://x").unwrap();
        assert_eq!(cmd.flags().collect::<Vec<_>>(), vec!["--max-time", "--data"]);
    }

    #[test]
    fn test_bundled_short_flags_are_unknown() {
        assert!(validate("curl -s -S -L https://x").is_ok());
        assert_eq!(rejection("curl -sSL https://x"), Rejection::UnknownFlag { flag: "-sSL".into() });
        assert_eq!(rejection("curl -XPOST https://x"), Rejection::UnknownFlag { flag: "-XPOST".into() });
    }

    #[test]
    fn test_validation_is_idempotent() {
        let first = validate(r#"curl -H 'Accept: application/json' -s -S "https://x/a b""#).unwrap();
        let second = validate(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rewritten_command_revalidates_to_same_argv() {
        let original = validate(r#"curl -X POST "https://x" -d '{ "a" : 1 }'"#).unwrap();
        let line = r#"curl -X POST "https://x" -d '{"a":1}'"#.to_string();
        let argv = shlex::split(&line).unwrap();
        let rewritten = ValidatedCommand::rewritten(line, argv);

        let again = validate(rewritten.as_str()).unwrap();
        assert_eq!(again.argv(), rewritten.argv());
        assert_eq!(again, validate(again.as_str()).unwrap());
        assert_eq!(again.argv()[..5], original.argv()[..5]);
        assert_eq!(again.argv()[5], r#"{"a":1}"#);
    }

    #[test]
    fn test_local_file_references_rejected() {
        for cmd in [
            "curl -d @secrets.txt https://x",
            "curl --data-binary @/etc/passwd https://x",
            "curl --json=@body.json https://x",
            "curl -F upload=@photo.png https://x",
            "curl --data-urlencode comment@notes.txt https://x",
            "curl -H @headers.txt https://x",
            "curl -b cookies.txt https://x",
        ] {
            assert!(
                matches!(rejection(cmd), Rejection::LocalFile { .. }),
                "{cmd} should be rejected"
            );
        }
    }

    #[test]
    fn test_literal_at_signs_accepted() {
        assert!(validate("curl -d email=a@b.example https://x").is_ok());
        assert!(validate("curl -F name=value -b session=abc https://x").is_ok());
        assert!(validate("curl --data-raw @literal https://x").is_ok());
        assert!(validate("curl https://user@host.example/").is_ok());
    }

    #[test]
    fn test_single_disallowed_flag_flips_result() {
        let base = r#"curl -X POST -H "Content-Type: application/json" -d '{"a":1}' https://x"#;
        assert!(validate(base).is_ok());
        for bad in ["-K", "--write-out", "--libcurl", "--unknown-flag", "-O"] {
            let cmd = format!("{base} {bad}");
            assert!(validate(&cmd).is_err(), "{cmd} should be rejected");
        }
    }
}
