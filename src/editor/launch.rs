//! Editor resolution and launch

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::RunContext;
use crate::errors::{CurlpadError, Result};

use super::template::{create_dictionary, input_line};

/// Editors tried in order when nothing is configured
pub const FALLBACK_EDITORS: &[&str] = &["nvim", "vim", "vi"];

/// Where the editor command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSource {
    Flag,
    Config,
    Visual,
    Editor,
    Path,
}

/// A resolved editor invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    pub program: String,
    pub args: Vec<String>,
    pub source: EditorSource,
}

impl EditorCommand {
    /// Split a user supplied editor command such as `code --wait`
    pub fn parse(command: &str, source: EditorSource) -> Result<Self> {
        let mut words = shlex::split(command)
            .ok_or_else(|| CurlpadError::Editor(format!("Cannot parse editor command `{}`", command)))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| CurlpadError::Editor("Editor command is empty".to_string()))?;
        Ok(Self {
            program,
            args: words.collect(),
            source,
        })
    }

    /// vim and nvim understand `+N` and `-c`
    pub fn is_vim_family(&self) -> bool {
        let stem = Path::new(&self.program)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        matches!(stem, "vim" | "nvim" | "gvim" | "mvim")
    }

    /// Full argument list for editing `buffer`
    pub fn argv(&self, buffer: &Path, dictionary: Option<&Path>) -> Vec<String> {
        let mut argv = self.args.clone();
        if self.is_vim_family() {
            argv.push(format!("+{}", input_line()));
            argv.push("-c".to_string());
            argv.push("setlocal filetype=sh".to_string());
            if let Some(dict) = dictionary {
                argv.push("-c".to_string());
                argv.push(format!("setlocal complete+=k dictionary={}", escape_vim_option(dict)));
            }
        }
        argv.push(buffer.to_string_lossy().into_owned());
        argv
    }
}

/// Spaces and backslashes need escaping inside a `:set` value
fn escape_vim_option(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(' ', "\\ ")
        .replace(',', "\\,")
}

/// Pick the editor: flag, config, `$VISUAL`, `$EDITOR`, then the first of
/// [`FALLBACK_EDITORS`] on `PATH`
pub fn resolve_editor(flag: Option<&str>, configured: Option<&str>) -> Result<EditorCommand> {
    resolve_with(flag, configured, |name| std::env::var(name).ok(), |name| which::which(name).ok())
}

fn resolve_with(
    flag: Option<&str>,
    configured: Option<&str>,
    var: impl Fn(&str) -> Option<String>,
    lookup: impl Fn(&str) -> Option<PathBuf>,
) -> Result<EditorCommand> {
    let candidates = [
        (flag.map(String::from), EditorSource::Flag),
        (configured.map(String::from), EditorSource::Config),
        (var("VISUAL"), EditorSource::Visual),
        (var("EDITOR"), EditorSource::Editor),
    ];

    for (command, source) in candidates {
        if let Some(command) = command.filter(|c| !c.trim().is_empty()) {
            return EditorCommand::parse(&command, source);
        }
    }

    FALLBACK_EDITORS
        .iter()
        .find_map(|name| lookup(name))
        .map(|path| EditorCommand {
            program: path.to_string_lossy().into_owned(),
            args: Vec::new(),
            source: EditorSource::Path,
        })
        .ok_or_else(|| {
            CurlpadError::Editor(format!(
                "No editor found. Set $EDITOR or install one of: {}",
                FALLBACK_EDITORS.join(", ")
            ))
        })
}

/// Open `buffer` in the editor and wait for it to close
pub async fn open_editor(ctx: &mut RunContext, editor: &EditorCommand, buffer: &Path) -> Result<()> {
    let dictionary = if editor.is_vim_family() {
        Some(create_dictionary(ctx)?)
    } else {
        None
    };
    let argv = editor.argv(buffer, dictionary.as_deref());
    debug!(program = %editor.program, ?argv, source = ?editor.source, "Launching editor");

    let status = tokio::process::Command::new(&editor.program)
        .args(&argv)
        .status()
        .await
        .map_err(|e| CurlpadError::Editor(format!("Failed to launch `{}`: {}", editor.program, e)))?;

    match status.code() {
        Some(0) => {}
        // vim's `:cq`; the buffer is still read
        Some(1) => debug!("Editor exited with status 1"),
        Some(code) => warn!(code, "Editor exited with a non-zero status"),
        None => warn!("Editor was terminated by a signal"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(
        flag: Option<&str>,
        configured: Option<&str>,
        vars: &[(&str, &str)],
        on_path: &[&str],
    ) -> Result<EditorCommand> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        resolve_with(
            flag,
            configured,
            |name| vars.get(name).cloned(),
            |name| on_path.contains(&name).then(|| PathBuf::from("/usr/bin").join(name)),
        )
    }

    #[test]
    fn test_flag_wins() {
        let editor = resolve(Some("nano"), Some("emacs"), &[("EDITOR", "vi")], &["vim"]).unwrap();
        assert_eq!(editor.program, "nano");
        assert_eq!(editor.source, EditorSource::Flag);
    }

    #[test]
    fn test_config_before_environment() {
        let editor = resolve(None, Some("emacs -nw"), &[("VISUAL", "code")], &[]).unwrap();
        assert_eq!(editor.program, "emacs");
        assert_eq!(editor.args, vec!["-nw"]);
        assert_eq!(editor.source, EditorSource::Config);
    }

    #[test]
    fn test_visual_before_editor() {
        let editor = resolve(None, None, &[("VISUAL", "code --wait"), ("EDITOR", "nano")], &[]).unwrap();
        assert_eq!(editor.program, "code");
        assert_eq!(editor.args, vec!["--wait"]);
        assert_eq!(editor.source, EditorSource::Visual);
    }

    #[test]
    fn test_blank_variable_skipped() {
        let editor = resolve(None, None, &[("VISUAL", " "), ("EDITOR", "nano")], &[]).unwrap();
        assert_eq!(editor.program, "nano");
    }

    #[test]
    fn test_path_fallback_order() {
        let editor = resolve(None, None, &[], &["vi", "vim"]).unwrap();
        assert_eq!(editor.program, "/usr/bin/vim");
        assert_eq!(editor.source, EditorSource::Path);
    }

    #[test]
    fn test_no_editor() {
        assert!(matches!(resolve(None, None, &[], &[]), Err(CurlpadError::Editor(_))));
    }

    #[test]
    fn test_unparseable_command() {
        assert!(EditorCommand::parse("vim 'oops", EditorSource::Flag).is_err());
        assert!(EditorCommand::parse("", EditorSource::Flag).is_err());
    }

    #[test]
    fn test_vim_argv() {
        let editor = EditorCommand::parse("/usr/bin/nvim", EditorSource::Flag).unwrap();
        assert!(editor.is_vim_family());
        let argv = editor.argv(Path::new("/tmp/buf.sh"), Some(Path::new("/tmp/my words.dict")));
        assert_eq!(argv[0], format!("+{}", input_line()));
        assert!(argv.contains(&"setlocal complete+=k dictionary=/tmp/my\\ words.dict".to_string()));
        assert_eq!(argv.last().map(String::as_str), Some("/tmp/buf.sh"));
    }

    #[test]
    fn test_other_editor_argv() {
        let editor = EditorCommand::parse("code --wait", EditorSource::Flag).unwrap();
        assert!(!editor.is_vim_family());
        assert_eq!(editor.argv(Path::new("/tmp/buf.sh"), None), vec!["--wait", "/tmp/buf.sh"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_editor_runs_program() {
        use crate::signals::InterruptSignal;

        let mut ctx = RunContext::new(false, InterruptSignal::new());
        let buffer = tempfile::NamedTempFile::new().unwrap();
        let editor = EditorCommand::parse("true", EditorSource::Flag).unwrap();
        open_editor(&mut ctx, &editor, buffer.path()).await.unwrap();

        let missing = EditorCommand::parse("curlpad-no-such-editor", EditorSource::Flag).unwrap();
        assert!(open_editor(&mut ctx, &missing, buffer.path()).await.is_err());
    }
}
