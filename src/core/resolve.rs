//! core::resolve
//!
//! Applies a [`Resolution`] to a set of conflicted paths.
//!
//! # Ordering
//!
//! `Both` checks out the ours side for every path, then the theirs side for
//! every path. Since both passes write the same files, each file ends with
//! the incoming content.
//!
//! # Failure
//!
//! The first failing checkout stops the pass and is returned. Files
//! already written stay written.

use std::collections::BTreeSet;

use crate::core::types::Resolution;
use crate::git::{ConflictSide, Git, GitError};

/// The checkout passes a resolution expands to, in application order.
pub fn sides(resolution: Resolution) -> &'static [ConflictSide] {
    match resolution {
        Resolution::Current => &[ConflictSide::Ours],
        Resolution::Incoming => &[ConflictSide::Theirs],
        Resolution::Both => &[ConflictSide::Ours, ConflictSide::Theirs],
    }
}

/// Resolve every path in `paths` with `resolution`.
///
/// Returns the number of checkouts performed.
pub fn apply(
    git: &Git,
    paths: &BTreeSet<String>,
    resolution: Resolution,
) -> Result<usize, GitError> {
    let mut checkouts = 0;

    for side in sides(resolution) {
        for path in paths {
            git.checkout_stage(path, *side)?;
            tracing::debug!(path = %path, side = %side, "checked out conflict side");
            checkouts += 1;
        }
    }

    Ok(checkouts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_ours_only() {
        assert_eq!(sides(Resolution::Current), &[ConflictSide::Ours]);
    }

    #[test]
    fn incoming_is_theirs_only() {
        assert_eq!(sides(Resolution::Incoming), &[ConflictSide::Theirs]);
    }

    #[test]
    fn both_is_ours_then_theirs() {
        assert_eq!(
            sides(Resolution::Both),
            &[ConflictSide::Ours, ConflictSide::Theirs]
        );
    }
}
