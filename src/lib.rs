//! gitutil - everyday git operations and GitHub OAuth tokens from one CLI
//!
//! A thin command-line layer over libgit2 (via `git2`): initialize a
//! repository, stage and commit files, push with a token, inspect status,
//! resolve merge conflicts with one strategy, and obtain a GitHub OAuth
//! token through the browser.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing, dispatch, and exit codes
//! - [`engine`] - Per-invocation context (flags and config)
//! - [`core`] - Domain types, configuration, and conflict resolution
//! - [`git`] - Single interface for all Git operations
//! - [`auth`] - GitHub OAuth web application flow
//! - [`logging`] - Diagnostic logging to stderr
//! - [`ui`] - User-facing output and prompts

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod logging;
pub mod ui;
