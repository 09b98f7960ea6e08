//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only; implies non-interactive
//! - `--strict`: Exit non-zero when the command fails

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gitutil - everyday git operations and GitHub OAuth tokens
#[derive(Parser, Debug)]
#[command(name = "gitutil")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gitutil was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only; implies no prompts
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Exit with status 1 when the command fails
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Determine if interactive mode is enabled.
    ///
    /// Prompts read from stdin, which may be a pipe; only `--quiet`
    /// turns them off.
    pub fn interactive(&self) -> bool {
        !self.quiet
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a repository
    #[command(after_help = "\
EXAMPLES:
    gitutil init ./my-project")]
    Init {
        /// Directory to initialize (created if missing)
        path: PathBuf,
    },

    /// Stage files
    #[command(after_help = "\
EXAMPLES:
    gitutil add README.md,src/main.rs
    gitutil add .")]
    Add {
        /// Comma-separated paths or pathspecs
        #[arg(value_name = "PATHS")]
        paths: String,
    },

    /// Stage files and commit them
    #[command(after_help = "\
EXAMPLES:
    gitutil commit README.md,src/main.rs \"Update docs\"")]
    Commit {
        /// Comma-separated paths or pathspecs
        #[arg(value_name = "PATHS")]
        paths: String,

        /// Commit message
        message: String,
    },

    /// Push the current branch to a remote URL
    #[command(after_help = "\
EXAMPLES:
    gitutil push https://github.com/owner/repo.git gho_xxxx")]
    Push {
        /// Remote URL
        remote_url: String,

        /// Access token sent as the password
        token: String,
    },

    /// Show untracked, modified, staged, and conflicting files
    Status,

    /// Resolve merge conflicts in the working tree
    #[command(
        long_about = "Resolve every conflicted file with one strategy.\n\n\
            1 keeps the current (ours) side, 2 takes the incoming (theirs) side, \
            3 writes ours and then theirs. The files are written to the working \
            tree; stage them with `gitutil add` afterwards.",
        after_help = "\
EXAMPLES:
    gitutil resolve
    gitutil resolve --choice 2"
    )]
    Resolve {
        /// Strategy number (1, 2, or 3); prompts when omitted
        #[arg(long)]
        choice: Option<String>,
    },

    /// Obtain a GitHub OAuth token through the browser
    #[command(
        long_about = "Obtain a GitHub OAuth token through the browser.\n\n\
            Prints the authorization URL, opens it, and waits for GitHub to \
            redirect to http://localhost:<port>/callback. The code is exchanged \
            for a token, which is printed.",
        after_help = "\
CREDENTIALS:
    --client-id / --client-secret, then GITHUB_CLIENT_ID / GITHUB_CLIENT_SECRET,
    then [oauth] in the config file. A missing secret is prompted for."
    )]
    Auth {
        /// OAuth app client id
        #[arg(long)]
        client_id: Option<String>,

        /// OAuth app client secret
        #[arg(long)]
        client_secret: Option<String>,

        /// Local callback port (default 8000)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,

        /// Seconds to wait for the browser callback
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Print the URL without opening a browser
        #[arg(long)]
        no_browser: bool,
    },
}

impl Command {
    /// Subcommand names, in help order.
    pub const NAMES: [&'static str; 7] =
        ["init", "add", "commit", "push", "status", "resolve", "auth"];

    /// Name of this subcommand.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::Add { .. } => "add",
            Command::Commit { .. } => "commit",
            Command::Push { .. } => "push",
            Command::Status => "status",
            Command::Resolve { .. } => "resolve",
            Command::Auth { .. } => "auth",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_commit() {
        let cli = Cli::try_parse_from(["gitutil", "commit", "a.txt,b.txt", "msg"]).unwrap();
        match cli.command {
            Command::Commit { paths, message } => {
                assert_eq!(paths, "a.txt,b.txt");
                assert_eq!(message, "msg");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::try_parse_from(["gitutil", "status", "--strict", "-q"]).unwrap();
        assert!(cli.strict);
        assert!(cli.quiet);
        assert!(!cli.interactive());
    }

    #[test]
    fn parse_auth_flags() {
        let cli = Cli::try_parse_from([
            "gitutil",
            "auth",
            "--client-id",
            "Iv1.abc",
            "--port",
            "9000",
            "--no-browser",
        ])
        .unwrap();
        match cli.command {
            Command::Auth {
                client_id,
                client_secret,
                port,
                no_browser,
                ..
            } => {
                assert_eq!(client_id.as_deref(), Some("Iv1.abc"));
                assert!(client_secret.is_none());
                assert_eq!(port, Some(9000));
                assert!(no_browser);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn auth_port_zero_is_rejected() {
        assert!(Cli::try_parse_from(["gitutil", "auth", "--port", "0"]).is_err());
        assert!(Cli::try_parse_from(["gitutil", "auth", "--port", "1"]).is_ok());
    }

    #[test]
    fn names_match_subcommands() {
        let cmd = Cli::command();
        for name in Command::NAMES {
            assert!(
                cmd.find_subcommand(name).is_some(),
                "missing subcommand {}",
                name
            );
        }
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert!(Cli::try_parse_from(["gitutil", "STATUS"]).is_err());
    }
}
