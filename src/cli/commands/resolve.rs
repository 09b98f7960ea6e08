//! cli::commands::resolve
//!
//! Resolve every merge conflict in the working tree with one strategy.
//!
//! # Flow
//!
//! 1. Detect: no conflicting paths means nothing to do
//! 2. Present: list the conflicting paths
//! 3. Choose: `--choice`, or one line read from stdin
//! 4. Apply: see [`crate::core::resolve::apply`]
//!
//! An unparseable choice ends the command without touching any file and
//! without asking again.

use std::io::{self, BufRead};

use anyhow::{Context as _, Result};

use crate::core::resolve;
use crate::core::types::Resolution;
use crate::engine::Context;
use crate::git::Git;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts::{self, PromptError};

/// What a resolve run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The working tree had no conflicts.
    NoConflicts,
    /// The choice was not 1, 2, or 3; nothing was changed.
    InvalidChoice,
    /// Every conflicting path was written with the chosen strategy.
    Resolved { resolution: Resolution, paths: usize },
}

/// Run the resolve command against stdin.
pub fn resolve(ctx: &Context, choice: Option<&str>) -> Result<()> {
    let git = ctx.open_repo().context("could not open repository")?;
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    resolve_with_input(&git, choice, &mut input, ctx.interactive, verbosity)?;
    Ok(())
}

/// Run the resolve flow reading the choice from `input`.
///
/// `input` is only read when `choice` is `None` and `interactive` is set.
pub fn resolve_with_input<R: BufRead>(
    git: &Git,
    choice: Option<&str>,
    input: &mut R,
    interactive: bool,
    verbosity: Verbosity,
) -> Result<ResolveOutcome> {
    let snapshot = git.status()?;
    if !snapshot.has_conflicts() {
        output::print("No conflicts detected.", verbosity);
        return Ok(ResolveOutcome::NoConflicts);
    }

    output::print(
        output::format_section("Conflicting files:", &snapshot.conflicting),
        verbosity,
    );

    let resolution = match choice {
        Some(choice) => Resolution::parse_input(choice).ok(),
        None => {
            if !interactive {
                return Err(PromptError::NotInteractive(
                    "pass --choice 1, 2, or 3 to resolve without a prompt".to_string(),
                )
                .into());
            }
            prompt_resolution(input, verbosity)?
        }
    };

    let Some(resolution) = resolution else {
        output::print("Invalid choice. No action taken.", verbosity);
        return Ok(ResolveOutcome::InvalidChoice);
    };

    tracing::debug!(strategy = %resolution, paths = snapshot.conflicting.len(), "applying resolution");
    resolve::apply(git, &snapshot.conflicting, resolution)?;

    output::print("Conflicts resolved successfully.", verbosity);
    output::print(
        format!(
            "Resolved {} file(s) using {} changes.",
            snapshot.conflicting.len(),
            resolution
        ),
        verbosity,
    );

    Ok(ResolveOutcome::Resolved {
        resolution,
        paths: snapshot.conflicting.len(),
    })
}

fn prompt_resolution<R: BufRead>(
    input: &mut R,
    verbosity: Verbosity,
) -> Result<Option<Resolution>, PromptError> {
    output::print("Choose how to resolve the conflicts:", verbosity);
    for (number, resolution) in Resolution::ALL.iter().enumerate() {
        output::print(format!("{}. {}", number + 1, resolution.label()), verbosity);
    }
    output::flush();

    match prompts::read_resolution(input) {
        Ok(resolution) => Ok(resolution),
        Err(PromptError::EndOfInput) => Ok(None),
        Err(e) => Err(e),
    }
}
