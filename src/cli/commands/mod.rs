//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens (or creates) the repository through [`crate::git::Git`]
//! 2. Performs one operation
//! 3. Formats and displays output
//!
//! Handlers return errors instead of logging them; [`crate::cli::run`]
//! logs and picks the exit code.
//!
//! # Async Commands
//!
//! `auth` needs network I/O and a local HTTP listener. It builds its own
//! tokio runtime and blocks on it, so dispatch stays synchronous.

mod add;
mod auth;
mod commit;
mod init;
mod push;
mod resolve;
mod status;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use auth::{auth, AuthArgs};
pub use commit::commit;
pub use init::init;
pub use push::push;
pub use resolve::{resolve, resolve_with_input, ResolveOutcome};
pub use status::{render_status, status};

use anyhow::Result;

use crate::cli::args::Command;
use crate::engine::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init { path } => init::init(ctx, &path),
        Command::Add { paths } => add::add(ctx, &paths),
        Command::Commit { paths, message } => commit::commit(ctx, &paths, &message),
        Command::Push { remote_url, token } => push::push(ctx, &remote_url, &token),
        Command::Status => status::status(ctx),
        Command::Resolve { choice } => resolve::resolve(ctx, choice.as_deref()),
        Command::Auth {
            client_id,
            client_secret,
            port,
            timeout,
            no_browser,
        } => auth::auth(
            ctx,
            AuthArgs {
                client_id,
                client_secret,
                port,
                timeout,
                no_browser,
            },
        ),
    }
}
