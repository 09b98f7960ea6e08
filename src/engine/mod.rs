//! engine
//!
//! Execution context shared by every command.
//!
//! The context carries the global flags and the loaded configuration. It is
//! built once by [`crate::cli::run`] and passed by reference to each
//! handler. Nothing in it is process-wide state.

use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::git::{Git, GitError};

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags and the config file.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (errors only).
    pub quiet: bool,
    /// Interactive mode enabled.
    pub interactive: bool,
    /// Failed commands exit non-zero.
    pub strict: bool,
    /// Loaded configuration (defaults if no file exists).
    pub config: Config,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            cwd: None,
            debug: false,
            quiet: false,
            interactive: true,
            strict: false,
            config: Config::default(),
        }
    }
}

impl Context {
    /// Directory commands operate in.
    pub fn work_path(&self) -> PathBuf {
        match &self.cwd {
            Some(path) => path.clone(),
            None => PathBuf::from("."),
        }
    }

    /// Open the repository containing [`Context::work_path`].
    pub fn open_repo(&self) -> Result<Git, GitError> {
        let path = self.work_path();
        tracing::debug!(path = %path.display(), "opening repository");
        Git::open(&path)
    }

    /// Resolve `path` against the working directory override.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }
}
