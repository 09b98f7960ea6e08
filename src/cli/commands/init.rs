//! cli::commands::init
//!
//! Create a repository.

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::engine::Context;
use crate::git::Git;
use crate::ui::output::{self, Verbosity};

/// Run the init command.
///
/// Relative paths are taken from `--cwd` when it is set.
pub fn init(ctx: &Context, path: &Path) -> Result<()> {
    let target = ctx.resolve_path(path);

    let git = Git::init(&target)
        .with_context(|| format!("could not initialize repository at {}", target.display()))?;
    let info = git.info()?;

    tracing::info!(git_dir = %info.git_dir.display(), "repository initialized");
    output::print(
        format!("Initialized repository in {}", info.work_dir.display()),
        Verbosity::from_flags(ctx.quiet, ctx.debug),
    );

    Ok(())
}
