//! cli::commands::push
//!
//! Push the current branch to a URL with a token.
//!
//! # Security
//!
//! The token is handed to libgit2 as a password and never logged.

use anyhow::{Context as _, Result};

use crate::engine::Context;
use crate::ui::output::{self, Verbosity};

/// Run the push command.
pub fn push(ctx: &Context, remote_url: &str, token: &str) -> Result<()> {
    let git = ctx.open_repo().context("could not open repository")?;

    tracing::debug!(remote = remote_url, "pushing");
    git.push(remote_url, token)?;

    output::print(
        format!("Pushed to {}", remote_url),
        Verbosity::from_flags(ctx.quiet, ctx.debug),
    );

    Ok(())
}
