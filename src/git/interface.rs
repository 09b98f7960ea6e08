//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module is the **single doorway** to all Git operations in gitutil.
//! Every command goes through the [`Git`] handle, which wraps an opened
//! `git2::Repository` and normalizes libgit2 failures into [`GitError`]
//! variants named after the operation that failed.
//!
//! # Error Handling
//!
//! Each operation maps to one failure category:
//! - [`GitError::NotARepo`] / [`GitError::BareRepo`]: opening
//! - [`GitError::InitFailed`]: repository creation
//! - [`GitError::StagingFailed`] / [`GitError::CommitFailed`]: index and commit
//! - [`GitError::PushFailed`]: transport or remote rejection
//! - [`GitError::StatusFailed`] / [`GitError::ConflictQueryFailed`]: queries
//! - [`GitError::CheckoutFailed`]: writing one side of a conflict
//!
//! # Example
//!
//! ```ignore
//! use gitutil::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let status = git.status()?;
//! for path in &status.untracked {
//!     println!("{}", path);
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{Oid, PathSet};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Creating a repository failed.
    #[error("failed to initialize repository at {path}: {message}")]
    InitFailed {
        /// Target directory
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// Adding paths to the index failed.
    #[error("failed to stage files: {message}")]
    StagingFailed {
        /// Underlying cause
        message: String,
    },

    /// Creating the commit failed.
    #[error("failed to commit: {message}")]
    CommitFailed {
        /// Underlying cause
        message: String,
    },

    /// Push failed in transport or was rejected by the remote.
    #[error("push to {remote} failed: {message}")]
    PushFailed {
        /// Remote URL
        remote: String,
        /// Underlying cause
        message: String,
    },

    /// Computing repository status failed.
    #[error("failed to read repository status: {message}")]
    StatusFailed {
        /// Underlying cause
        message: String,
    },

    /// Reading the conflict entries of the index failed.
    #[error("failed to read conflicts: {message}")]
    ConflictQueryFailed {
        /// Underlying cause
        message: String,
    },

    /// Writing one side of a conflicted path failed.
    #[error("failed to check out {side} version of {path}: {message}")]
    CheckoutFailed {
        /// The conflicted path
        path: String,
        /// Which side was requested
        side: ConflictSide,
        /// Underlying cause
        message: String,
    },

    /// Any other git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// One side of a merge conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSide {
    /// Stage 2: the branch being merged into.
    Ours,
    /// Stage 3: the branch being merged in.
    Theirs,
}

impl fmt::Display for ConflictSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictSide::Ours => write!(f, "ours"),
            ConflictSide::Theirs => write!(f, "theirs"),
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// Author/committer identity used when the repository config has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Paths grouped by status, computed fresh on every query.
///
/// `untracked`, `modified` and `conflicting` are disjoint: a conflicted
/// entry is reported only as conflicting. `staged` describes the index side
/// and may overlap with `modified` (staged, then edited again).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Files in the working tree that the index does not know about
    pub untracked: BTreeSet<String>,
    /// Tracked files whose working-tree content differs from the index
    pub modified: BTreeSet<String>,
    /// Files whose index entry differs from HEAD
    pub staged: BTreeSet<String>,
    /// Files with unresolved merge conflicts
    pub conflicting: BTreeSet<String>,
}

impl StatusSnapshot {
    /// No changes of any kind, untracked files included.
    pub fn is_clean(&self) -> bool {
        self.untracked.is_empty()
            && self.modified.is_empty()
            && self.staged.is_empty()
            && self.conflicting.is_empty()
    }

    /// Check if there are unresolved conflicts.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicting.is_empty()
    }
}

/// The Git interface.
///
/// An opened repository, owned by one command invocation and passed
/// explicitly to every operation.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// Directory the repository was opened from, relative to the workdir
    /// (`/`-separated, empty at the root)
    prefix: String,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        let prefix = match repo.workdir() {
            Some(workdir) => relative_prefix(workdir, path),
            None => String::new(),
        };

        Ok(Self { repo, prefix })
    }

    /// Create a new repository at `path`, creating the directory if needed.
    ///
    /// Re-initializing an existing repository is left to libgit2, which
    /// keeps existing objects and refs.
    pub fn init(path: &Path) -> Result<Self, GitError> {
        let init_failed = |message: String| GitError::InitFailed {
            path: path.to_path_buf(),
            message,
        };

        fs::create_dir_all(path).map_err(|e| init_failed(e.to_string()))?;
        let repo = git2::Repository::init(path).map_err(|e| init_failed(e.message().to_string()))?;

        Ok(Self {
            repo,
            prefix: String::new(),
        })
    }

    /// Get repository information (git_dir and work_dir paths).
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        let git_dir = self.repo.path().to_path_buf();
        let work_dir = self.work_dir()?.to_path_buf();

        Ok(RepoInfo { git_dir, work_dir })
    }

    /// Get the working directory path.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    // =========================================================================
    // HEAD
    // =========================================================================

    /// Get the current branch name.
    ///
    /// Returns `None` for a detached HEAD or a branch with no commits yet.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if is_unborn(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok(None);
        }

        Ok(head.shorthand().map(str::to_string))
    }

    /// Get the commit HEAD points to, if any.
    pub fn head_oid(&self) -> Result<Option<Oid>, GitError> {
        match self.head_commit()? {
            Some(commit) => Ok(Oid::new(commit.id().to_string()).ok()),
            None => Ok(None),
        }
    }

    /// Number of commits reachable from HEAD (0 on an unborn branch).
    pub fn commit_count(&self) -> Result<usize, GitError> {
        if self.head_commit()?.is_none() {
            return Ok(0);
        }

        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        let mut count = 0;
        for oid in walk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, git2::Error> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Index and Commit
    // =========================================================================

    /// Add every path in `paths` to the index and write it.
    ///
    /// Paths are handed to libgit2 as pathspecs relative to the directory
    /// the repository was opened from, so `.` stages everything below it.
    pub fn stage(&self, paths: &PathSet) -> Result<(), GitError> {
        let staging_failed = |e: git2::Error| GitError::StagingFailed {
            message: e.message().to_string(),
        };

        let specs: Vec<String> = paths.iter().map(|path| self.pathspec(path)).collect();
        tracing::debug!(specs = ?specs, "staging pathspecs");

        let mut index = self.repo.index().map_err(staging_failed)?;
        index
            .add_all(specs.iter(), git2::IndexAddOption::DEFAULT, None)
            .map_err(staging_failed)?;
        index.write().map_err(staging_failed)?;

        Ok(())
    }

    /// Rewrite a path given relative to the opening directory as a
    /// workdir-relative pathspec.
    fn pathspec(&self, path: &str) -> String {
        let path = path.trim_start_matches("./");
        if self.prefix.is_empty() {
            return path.to_string();
        }
        match path {
            "." | "" => self.prefix.clone(),
            _ => format!("{}/{}", self.prefix, path),
        }
    }

    /// Commit the current index on HEAD.
    ///
    /// During a merge the commits in MERGE_HEAD become additional parents
    /// and the merge state is cleaned up afterwards.
    ///
    /// The message is passed through unchecked. Nothing prevents a commit
    /// whose tree equals its parent's, so committing with no changes
    /// creates an empty commit.
    ///
    /// The identity comes from the repository's git config; `fallback` is
    /// used only when that lookup fails.
    pub fn commit(&self, message: &str, fallback: Option<&Identity>) -> Result<Oid, GitError> {
        let commit_failed = |e: git2::Error| GitError::CommitFailed {
            message: e.message().to_string(),
        };

        let signature = self.signature(fallback)?;

        let mut index = self.repo.index().map_err(commit_failed)?;
        let tree_id = index.write_tree().map_err(commit_failed)?;
        let tree = self.repo.find_tree(tree_id).map_err(commit_failed)?;

        let head = self.head_commit().map_err(commit_failed)?;
        let merged = self.merge_heads().map_err(commit_failed)?;
        let parents: Vec<&git2::Commit<'_>> = head.iter().chain(merged.iter()).collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(commit_failed)?;

        if !merged.is_empty() {
            tracing::debug!(parents = parents.len(), "concluded merge");
            self.repo.cleanup_state().map_err(commit_failed)?;
        }

        Oid::new(oid.to_string()).map_err(|e| GitError::CommitFailed {
            message: e.to_string(),
        })
    }

    /// Commits recorded in MERGE_HEAD while a merge is in progress.
    fn merge_heads(&self) -> Result<Vec<git2::Commit<'_>>, git2::Error> {
        if self.repo.state() != git2::RepositoryState::Merge {
            return Ok(Vec::new());
        }

        let mut oids = Vec::new();
        self.repo.mergehead_foreach(|oid| {
            oids.push(*oid);
            true
        })?;

        oids.into_iter()
            .map(|oid| self.repo.find_commit(oid))
            .collect()
    }

    fn signature(&self, fallback: Option<&Identity>) -> Result<git2::Signature<'static>, GitError> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(err) => match fallback {
                Some(identity) => git2::Signature::now(&identity.name, &identity.email).map_err(
                    |e| GitError::CommitFailed {
                        message: format!("invalid fallback identity: {}", e.message()),
                    },
                ),
                None => Err(GitError::CommitFailed {
                    message: format!(
                        "no committer identity; set user.name and user.email ({})",
                        err.message()
                    ),
                }),
            },
        }
    }

    // =========================================================================
    // Push
    // =========================================================================

    /// Push the current branch to `remote_url`.
    ///
    /// Credentials are offered as user/password with an empty username and
    /// `token` as the password. One attempt; a rejected reference is
    /// reported as a failure.
    pub fn push(&self, remote_url: &str, token: &str) -> Result<(), GitError> {
        let push_failed = |message: String| GitError::PushFailed {
            remote: remote_url.to_string(),
            message,
        };

        let branch = self
            .current_branch()
            .map_err(|e| push_failed(e.to_string()))?
            .ok_or_else(|| push_failed("HEAD is not on a branch with commits".to_string()))?;
        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);

        let mut remote = self
            .repo
            .remote_anonymous(remote_url)
            .map_err(|e| push_failed(e.message().to_string()))?;

        let rejection: RefCell<Option<String>> = RefCell::new(None);
        let attempts = Cell::new(0u32);

        {
            let mut callbacks = git2::RemoteCallbacks::new();
            callbacks.credentials(|_url, _username, allowed| {
                // libgit2 calls back again after a 401; give up after one try.
                attempts.set(attempts.get() + 1);
                if attempts.get() > 1 {
                    return Err(git2::Error::from_str("authentication rejected"));
                }
                if allowed.is_user_pass_plaintext() {
                    git2::Cred::userpass_plaintext("", token)
                } else {
                    git2::Cred::default()
                }
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(msg) = status {
                    *rejection.borrow_mut() = Some(format!("{} rejected: {}", refname, msg));
                }
                Ok(())
            });

            let mut push_options = git2::PushOptions::new();
            push_options.remote_callbacks(callbacks);

            remote
                .push(&[refspec.as_str()], Some(&mut push_options))
                .map_err(|e| push_failed(e.message().to_string()))?;
        }

        if let Some(msg) = rejection.into_inner() {
            return Err(push_failed(msg));
        }

        Ok(())
    }

    // =========================================================================
    // Status and Conflicts
    // =========================================================================

    /// Compute the full working tree status.
    ///
    /// Untracked directories are expanded to their files; ignored files
    /// are skipped.
    pub fn status(&self) -> Result<StatusSnapshot, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::StatusFailed {
                message: e.message().to_string(),
            })?;

        let mut snapshot = StatusSnapshot::default();

        for entry in statuses.iter() {
            let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
            let status = entry.status();

            if status.is_conflicted() {
                snapshot.conflicting.insert(path);
                continue;
            }

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                snapshot.staged.insert(path.clone());
            }

            if status.is_wt_new() {
                snapshot.untracked.insert(path);
            } else if status.is_wt_modified() || status.is_wt_typechange() {
                snapshot.modified.insert(path);
            }
        }

        Ok(snapshot)
    }

    /// The conflict entries recorded in the index for `path`, if any.
    fn find_conflict(&self, path: &str) -> Result<Option<git2::IndexConflict>, GitError> {
        let query_failed = |e: git2::Error| GitError::ConflictQueryFailed {
            message: e.message().to_string(),
        };

        let index = self.repo.index().map_err(query_failed)?;
        if !index.has_conflicts() {
            return Ok(None);
        }

        for conflict in index.conflicts().map_err(query_failed)? {
            let conflict = conflict.map_err(query_failed)?;
            let matches = [&conflict.ancestor, &conflict.our, &conflict.their]
                .into_iter()
                .flatten()
                .any(|entry| entry.path == path.as_bytes());
            if matches {
                return Ok(Some(conflict));
            }
        }

        Ok(None)
    }

    /// Write one side of a conflicted path into the working tree.
    ///
    /// Same effect as `git checkout --ours/--theirs -- <path>`: libgit2
    /// checks out that stage with the usual filters and file modes, and the
    /// index keeps its conflict entries until the path is staged.
    pub fn checkout_stage(&self, path: &str, side: ConflictSide) -> Result<(), GitError> {
        let checkout_failed = |message: String| GitError::CheckoutFailed {
            path: path.to_string(),
            side,
            message,
        };

        let conflict = self
            .find_conflict(path)?
            .ok_or_else(|| checkout_failed("path is not conflicted".to_string()))?;
        let present = match side {
            ConflictSide::Ours => conflict.our.is_some(),
            ConflictSide::Theirs => conflict.their.is_some(),
        };
        if !present {
            return Err(checkout_failed(format!("no {} version exists", side)));
        }

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.path(path).disable_pathspec_match(true).force();
        match side {
            ConflictSide::Ours => checkout.use_ours(true),
            ConflictSide::Theirs => checkout.use_theirs(true),
        };

        self.repo
            .checkout_index(None, Some(&mut checkout))
            .map_err(|e| checkout_failed(e.message().to_string()))
    }
}

/// `dir` relative to `workdir`, `/`-separated. Empty when `dir` is the
/// workdir itself or cannot be placed inside it.
fn relative_prefix(workdir: &Path, dir: &Path) -> String {
    let (Ok(workdir), Ok(dir)) = (workdir.canonicalize(), dir.canonicalize()) else {
        return String::new();
    };

    match dir.strip_prefix(&workdir) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => String::new(),
    }
}

fn is_unborn(err: &git2::Error) -> bool {
    matches!(
        err.code(),
        git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound
    )
}
