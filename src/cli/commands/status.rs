//! cli::commands::status
//!
//! Print the working tree status grouped by category.

use anyhow::{Context as _, Result};

use crate::engine::Context;
use crate::git::StatusSnapshot;
use crate::ui::output;

/// Render a snapshot as the text printed by `status`.
///
/// Each non-empty category is a heading followed by one path per line.
pub fn render_status(snapshot: &StatusSnapshot) -> String {
    if snapshot.is_clean() {
        return "Working tree clean.".to_string();
    }

    let sections = [
        ("Untracked files:", &snapshot.untracked),
        ("Modified files:", &snapshot.modified),
        ("Staged files:", &snapshot.staged),
        ("Conflicting files:", &snapshot.conflicting),
    ];

    sections
        .iter()
        .filter(|(_, paths)| !paths.is_empty())
        .map(|(heading, paths)| output::format_section(heading, paths.iter()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the status command.
///
/// The status is the requested result, so it is printed even with `--quiet`.
pub fn status(ctx: &Context) -> Result<()> {
    let git = ctx.open_repo().context("could not open repository")?;
    let snapshot = git.status()?;

    tracing::debug!(
        untracked = snapshot.untracked.len(),
        modified = snapshot.modified.len(),
        staged = snapshot.staged.len(),
        conflicting = snapshot.conflicting.len(),
        "status computed"
    );
    output::emit(render_status(&snapshot));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> std::collections::BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clean_tree() {
        assert_eq!(
            render_status(&StatusSnapshot::default()),
            "Working tree clean."
        );
    }

    #[test]
    fn untracked_and_modified_are_distinct() {
        let snapshot = StatusSnapshot {
            untracked: set(&["new.txt"]),
            modified: set(&["old.txt"]),
            ..Default::default()
        };

        assert_eq!(
            render_status(&snapshot),
            "Untracked files:\nnew.txt\nModified files:\nold.txt"
        );
    }

    #[test]
    fn empty_sections_are_skipped() {
        let snapshot = StatusSnapshot {
            conflicting: set(&["x.txt"]),
            ..Default::default()
        };

        assert_eq!(render_status(&snapshot), "Conflicting files:\nx.txt");
    }

    #[test]
    fn section_order() {
        let snapshot = StatusSnapshot {
            untracked: set(&["u"]),
            modified: set(&["m"]),
            staged: set(&["s"]),
            conflicting: set(&["c"]),
        };

        let rendered = render_status(&snapshot);
        let order: Vec<usize> = [
            "Untracked files:",
            "Modified files:",
            "Staged files:",
            "Conflicting files:",
        ]
        .iter()
        .map(|h| rendered.find(h).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }
}
