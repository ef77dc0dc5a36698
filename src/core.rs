//! Orchestration of a curlpad run: edit, extract, validate, format, confirm, execute

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dialoguer::Confirm;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, LogFormat, Shell};
use crate::config::Config;
use crate::context::{Environment, RunContext};
use crate::editor::{create_template, open_editor, resolve_editor};
use crate::errors::{CurlpadError, Result};
use crate::exec::{platform_launcher, render_stdout, ExecutionResult, Executor};
use crate::extract::extract_commands;
use crate::format::{format_payloads, FORMATTER_PROGRAM};
use crate::output::formatters::JsonFormatterOptions;
use crate::output::terminal::{self, rule};
use crate::signals::InterruptSignal;
use crate::status::ExitStatus;
use crate::validate::{validate, ValidatedCommand};
use crate::PERMITTED_PROGRAM;

/// Main entry point for the CLI.
///
/// Handles argument parsing, configuration loading and logging setup, then
/// drives [`program`] on a tokio runtime.
pub fn run(args: Vec<String>, mut env: Environment, interrupt: InterruptSignal) -> ExitStatus {
    if let Some(name) = args.first() {
        if let Some(basename) = std::path::Path::new(name).file_stem() {
            env.program_name = basename.to_string_lossy().to_string();
        }
    }

    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    if let Some(shell) = &parsed.generate_completions {
        generate_completions(shell, &env.program_name);
        return ExitStatus::Success;
    }

    if parsed.generate_manpage {
        return match generate_manpage() {
            Ok(()) => ExitStatus::Success,
            Err(e) => handle_error(e.into(), parsed.show_traceback()),
        };
    }

    if parsed.no_color {
        env.colors = false;
    }

    let traceback = parsed.show_traceback();
    let mut ctx = RunContext::new(parsed.debug_enabled(), interrupt);
    init_logging(&parsed, &ctx, &env);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Failed to load config: {}", env.paint("Warning:", terminal::warning), e);
            Config::default()
        }
    };
    debug!(?config, "Loaded configuration");

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(e.into(), traceback),
    };

    let status = match runtime.block_on(program(parsed, config, &env, &mut ctx)) {
        Ok(status) => status,
        Err(e) => handle_error(e, traceback),
    };

    ctx.cleanup();
    status
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(args: &Args, ctx: &RunContext, env: &Environment) {
    let level = if ctx.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && env.stderr_isatty && std::env::var_os("NO_COLOR").is_none())
        .with_target(false);

    let result = match args.log_format.unwrap_or_default() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// The full pipeline for one run
pub async fn program(
    args: Args,
    config: Config,
    env: &Environment,
    ctx: &mut RunContext,
) -> Result<ExitStatus> {
    debug!(?args, "Parsed arguments");

    if !args.dry_run {
        check_dependency(PERMITTED_PROGRAM)?;
    }

    let buffer = match &args.file {
        Some(path) => path.clone(),
        None => {
            let path = edit_buffer(&args, &config, ctx).await?;
            if ctx.was_interrupted() {
                return Ok(cancelled(env));
            }
            path
        }
    };

    let candidates = extract_commands(&buffer)?;
    if candidates.is_empty() {
        eprintln!("{}", env.paint("No uncommented command found", terminal::warning));
        return Ok(ExitStatus::Success);
    }
    info!(count = candidates.len(), "Extracted commands");

    let mut commands = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        match validate(candidate.as_str()) {
            Ok(command) => commands.push(command),
            Err(rejection) => {
                eprintln!("{}", env.paint(candidate.as_str(), terminal::muted));
                return Err(rejection.into());
            }
        }
    }

    if config.format_json && !args.no_format {
        let available = which::which(FORMATTER_PROGRAM).is_ok();
        if !available {
            debug!("{} not found, leaving payloads as written", FORMATTER_PROGRAM);
        }
        commands = format_payloads(commands, available, ctx.cancel_token()).await;
        if ctx.was_interrupted() {
            return Ok(cancelled(env));
        }
    }

    print!("{}", command_listing(&commands, env));
    std::io::stdout().flush()?;

    if args.dry_run {
        return Ok(ExitStatus::Success);
    }

    if !confirm(&args, &config, env, ctx)? {
        return Ok(cancelled(env));
    }

    let timeout = args.timeout.map(Duration::from_secs).unwrap_or(config.timeout);
    execute_all(&commands, timeout, &config.json, env, ctx).await
}

/// Fail early when a required program is missing from `PATH`
fn check_dependency(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| CurlpadError::MissingProgram(program.to_string()))
}

/// Create the template and let the user edit it
async fn edit_buffer(args: &Args, config: &Config, ctx: &mut RunContext) -> Result<PathBuf> {
    let url = args.url.as_deref().or(config.base_url.as_deref());
    let editor = resolve_editor(args.editor.as_deref(), config.editor.as_deref())?;
    let path = create_template(ctx, url)?;
    open_editor(ctx, &editor, &path).await?;
    Ok(path)
}

/// The commands about to run, framed by rules
pub fn command_listing(commands: &[ValidatedCommand], env: &Environment) -> String {
    let rule = env.paint(&rule(), terminal::muted);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&env.paint("Final command(s) to execute:", terminal::info));
    out.push('\n');
    for command in commands {
        out.push_str(command.as_str());
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Where the confirmation prompt is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptTerm {
    Stderr,
    Stdout,
}

/// Pick a terminal for the prompt. `None` when the user cannot answer one.
fn prompt_term(env: &Environment) -> Option<PromptTerm> {
    if !env.stdin_isatty {
        None
    } else if env.stderr_isatty {
        Some(PromptTerm::Stderr)
    } else if env.stdout_isatty {
        Some(PromptTerm::Stdout)
    } else {
        None
    }
}

/// Ask before running. Without a terminal to prompt on, proceed with a warning.
fn confirm(args: &Args, config: &Config, env: &Environment, ctx: &RunContext) -> Result<bool> {
    if args.yes || !config.confirm {
        return Ok(true);
    }

    let term = match prompt_term(env) {
        Some(PromptTerm::Stderr) => dialoguer::console::Term::stderr(),
        Some(PromptTerm::Stdout) => dialoguer::console::Term::stdout(),
        None => {
            eprintln!(
                "{}",
                env.paint(
                    "no terminal to confirm on; running without confirmation",
                    terminal::warning
                )
            );
            return Ok(true);
        }
    };

    match Confirm::new()
        .with_prompt("Execute?")
        .default(true)
        .interact_on(&term)
    {
        Ok(answer) => Ok(answer && !ctx.was_interrupted()),
        Err(_) if ctx.was_interrupted() => Ok(false),
        Err(e) => Err(CurlpadError::Prompt(e.to_string())),
    }
}

/// Run every command in order. A failing command does not stop the batch.
async fn execute_all(
    commands: &[ValidatedCommand],
    timeout: Duration,
    json: &JsonFormatterOptions,
    env: &Environment,
    ctx: &RunContext,
) -> Result<ExitStatus> {
    let launcher = platform_launcher();
    let executor = Executor::new(launcher.as_ref(), timeout, ctx.cancel_token());
    let mut failures = 0;

    for (index, command) in commands.iter().enumerate() {
        if ctx.was_interrupted() {
            return Ok(interrupted(env, failures));
        }

        println!("\n{}", env.paint("Running your cURL command...", terminal::info));
        debug!(index, command = command.as_str(), launcher = launcher.name(), "Executing");

        match executor.execute(command).await {
            Ok(result) => {
                print!("{}", result_sections(&result, json, env));
                std::io::stdout().flush()?;
                if !result.success() {
                    failures += 1;
                    eprintln!(
                        "{}",
                        env.paint(
                            &format!("cURL execution failed with exit code {}", result.status),
                            terminal::error
                        )
                    );
                }
            }
            Err(CurlpadError::Cancelled) => return Ok(interrupted(env, failures)),
            Err(e) => {
                failures += 1;
                warn!(index, error = %e, "Command failed");
                eprintln!("{}", env.paint(&e.to_string(), terminal::error));
            }
        }
    }

    Ok(ExitStatus::from_batch(failures))
}

/// Declined or interrupted runs end cleanly without running anything further
fn cancelled(env: &Environment) -> ExitStatus {
    eprintln!("{}", env.paint("Cancelled", terminal::warning));
    ExitStatus::Success
}

/// Cancelled part way through a batch. Failures seen so far still count.
fn interrupted(env: &Environment, failures: usize) -> ExitStatus {
    cancelled(env);
    ExitStatus::from_batch(failures)
}

/// STDOUT and STDERR sections for one finished command
pub fn result_sections(result: &ExecutionResult, json: &JsonFormatterOptions, env: &Environment) -> String {
    let mut out = String::new();
    if !result.stdout.is_empty() {
        out.push_str(&env.paint("STDOUT:", terminal::success));
        out.push('\n');
        out.push_str(&render_stdout(&result.stdout, json));
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    if !result.stderr.is_empty() {
        out.push_str(&env.paint("STDERR:", terminal::error));
        out.push('\n');
        out.push_str(&result.stderr);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn handle_error(error: CurlpadError, traceback: bool) -> ExitStatus {
    if traceback {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::Error
}

fn generate_completions(shell: &Shell, bin_name: &str) {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as ClapShell};

    let mut cmd = Args::command();
    let shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

fn generate_manpage() -> std::io::Result<()> {
    use clap::CommandFactory;

    let cmd = Args::command();
    let man = clap_mangen::Man::new(cmd);
    man.render(&mut std::io::stdout())
}
