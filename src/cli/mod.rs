//! cli
//!
//! Command-line interface layer for gitutil.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Log failures and decide the exit code
//!
//! # Exit codes
//!
//! Failures are logged with their full cause chain and the process exits 0.
//! With `--strict` (or `strict = true` in the config file) a failed command
//! exits 1. `--help` and `--version` always exit 0.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use std::ffi::OsString;
use std::process::ExitCode;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use thiserror::Error;

use crate::core::config::Config;
use crate::engine::Context;
use crate::logging;

/// Errors raised before a command handler runs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The first token is not a known command.
    #[error("unknown command '{name}'. Available commands: {}", .available.join(", "))]
    UnknownCommand { name: String, available: Vec<String> },

    /// A required argument was not supplied.
    #[error("missing argument {argument} for '{command}'")]
    MissingArgument { command: String, argument: String },

    /// No command was given at all.
    #[error("no command given. Available commands: {}", .available.join(", "))]
    MissingCommand { available: Vec<String> },

    /// Any other usage error reported by the parser.
    #[error("{0}")]
    Usage(String),
}

impl DispatchError {
    fn from_clap(err: &clap::Error, args: &[OsString]) -> Self {
        let available = || Command::NAMES.iter().map(|s| s.to_string()).collect();

        match err.kind() {
            ErrorKind::InvalidSubcommand => DispatchError::UnknownCommand {
                name: context_string(err, ContextKind::InvalidSubcommand)
                    .unwrap_or_else(|| "<unknown>".to_string()),
                available: available(),
            },
            ErrorKind::MissingRequiredArgument => DispatchError::MissingArgument {
                command: command_token(args).unwrap_or_else(|| "<unknown>".to_string()),
                argument: context_string(err, ContextKind::InvalidArg)
                    .unwrap_or_else(|| "<unknown>".to_string()),
            },
            ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                DispatchError::MissingCommand {
                    available: available(),
                }
            }
            _ => {
                let rendered = err.render().to_string();
                let message = rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string();
                DispatchError::Usage(message)
            }
        }
    }
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(s) => Some(s.clone()),
        ContextValue::Strings(v) => Some(v.join(", ")),
        _ => None,
    }
}

/// First argument naming a known command.
fn command_token(args: &[OsString]) -> Option<String> {
    args.iter()
        .skip(1)
        .filter_map(|a| a.to_str())
        .find(|a| Command::NAMES.contains(a))
        .map(str::to_string)
}

/// Global flags read straight from argv, for use before (or without) a
/// successful parse.
#[derive(Debug, Default, Clone, Copy)]
struct RawFlags {
    debug: bool,
    quiet: bool,
    strict: bool,
}

impl RawFlags {
    fn scan(args: &[OsString]) -> Self {
        let mut flags = RawFlags::default();
        for arg in args.iter().skip(1).filter_map(|a| a.to_str()) {
            match arg {
                "--" => break,
                "--debug" => flags.debug = true,
                "--quiet" | "-q" => flags.quiet = true,
                "--strict" => flags.strict = true,
                _ => {}
            }
        }
        flags
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => {
            if let Some(path) = config.loaded_from() {
                tracing::debug!(path = %path.display(), "loaded config");
            }
            config
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring config file; using defaults");
            Config::default()
        }
    }
}

/// Exit status for a failed command.
fn failure_status(strict: bool) -> u8 {
    if strict {
        1
    } else {
        0
    }
}

/// Run the CLI application with the process arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> ExitCode {
    run_from(std::env::args_os())
}

/// Run the CLI application with explicit arguments (first is the program name).
pub fn run_from<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let flags = RawFlags::scan(&args);
    logging::init(flags.debug, flags.quiet);

    let config = load_config();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            if err.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand {
                let _ = err.print();
            }
            let err = DispatchError::from_clap(&err, &args);
            tracing::error!("{}", err);
            return ExitCode::from(failure_status(flags.strict || config.strict()));
        }
    };

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
        strict: cli.strict || config.strict(),
        config,
    };

    let name = cli.command.name();
    tracing::debug!(command = name, "dispatching");

    match commands::dispatch(cli.command, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(command = name, "{:#}", err);
            ExitCode::from(failure_status(ctx.strict))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn parse_error(args: &[&str]) -> DispatchError {
        let args = os(args);
        let err = Cli::try_parse_from(&args).unwrap_err();
        DispatchError::from_clap(&err, &args)
    }

    #[test]
    fn unknown_command_is_named() {
        match parse_error(&["gitutil", "frobnicate"]) {
            DispatchError::UnknownCommand { name, available } => {
                assert_eq!(name, "frobnicate");
                assert!(available.contains(&"status".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unknown_command_message_lists_commands() {
        let msg = parse_error(&["gitutil", "frobnicate"]).to_string();
        assert!(msg.contains("frobnicate"));
        assert!(msg.contains("init, add, commit, push, status, resolve, auth"));
    }

    #[test]
    fn missing_message_names_argument() {
        match parse_error(&["gitutil", "commit", "a.txt"]) {
            DispatchError::MissingArgument { command, argument } => {
                assert_eq!(command, "commit");
                assert!(argument.contains("MESSAGE"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_push_token() {
        match parse_error(&["gitutil", "push", "https://example.com/r.git"]) {
            DispatchError::MissingArgument { command, argument } => {
                assert_eq!(command, "push");
                assert!(argument.contains("TOKEN"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn no_command() {
        assert!(matches!(
            parse_error(&["gitutil"]),
            DispatchError::MissingCommand { .. }
        ));
    }

    #[test]
    fn raw_flags_scan() {
        let flags = RawFlags::scan(&os(&["gitutil", "status", "-q", "--strict"]));
        assert!(flags.quiet);
        assert!(flags.strict);
        assert!(!flags.debug);

        let flags = RawFlags::scan(&os(&["gitutil", "add", "--", "--debug"]));
        assert!(!flags.debug);
    }

    #[test]
    fn failure_status_policy() {
        assert_eq!(failure_status(false), 0);
        assert_eq!(failure_status(true), 1);
    }
}
