//! cli::commands::add
//!
//! Stage a comma-separated list of paths.

use anyhow::{Context as _, Result};

use crate::core::types::PathSet;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};

/// Run the add command.
pub fn add(ctx: &Context, paths: &str) -> Result<()> {
    let paths = PathSet::parse(paths)?;
    let git = ctx.open_repo().context("could not open repository")?;

    git.stage(&paths)?;

    tracing::debug!(count = paths.len(), paths = %paths, "staged");
    output::print(
        format!("Staged: {}", paths),
        Verbosity::from_flags(ctx.quiet, ctx.debug),
    );

    Ok(())
}
