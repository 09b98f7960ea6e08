//! cli::commands::commit
//!
//! Stage paths and commit them in one step.
//!
//! If staging fails no commit is attempted.

use anyhow::{Context as _, Result};

use crate::core::types::PathSet;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};

/// Run the commit command.
pub fn commit(ctx: &Context, paths: &str, message: &str) -> Result<()> {
    let paths = PathSet::parse(paths)?;
    let git = ctx.open_repo().context("could not open repository")?;

    git.stage(&paths)?;

    let identity = ctx.config.commit_identity();
    let oid = git.commit(message, identity.as_ref())?;

    tracing::info!(oid = %oid, count = paths.len(), "committed");
    output::print(
        format!("Committed {}", oid.short(7)),
        Verbosity::from_flags(ctx.quiet, ctx.debug),
    );

    Ok(())
}
