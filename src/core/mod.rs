//! core
//!
//! Core domain types, configuration, and the conflict resolution pass.
//!
//! # Modules
//!
//! - [`types`] - Strong types: PathSet, Resolution, Oid
//! - [`config`] - Configuration schema and loading
//! - [`resolve`] - Apply a resolution strategy to conflicted paths

pub mod config;
pub mod resolve;
pub mod types;
