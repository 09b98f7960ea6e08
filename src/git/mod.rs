//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads and writes
//! flow through this interface. No other module should import `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery, opening and initialization
//! - Staging and committing
//! - Pushing the current branch
//! - Status and conflict queries
//! - Writing one side of a conflicted path
//!
//! # Example
//!
//! ```ignore
//! use gitutil::core::types::PathSet;
//! use gitutil::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! git.stage(&PathSet::parse("src/lib.rs,README.md")?)?;
//! let oid = git.commit("Update docs", None)?;
//! println!("committed {}", oid.short(7));
//! ```

mod interface;

pub use interface::{ConflictSide, Git, GitError, Identity, RepoInfo, StatusSnapshot};
