//! core::types
//!
//! Strong types for the values that cross the CLI boundary.
//!
//! # Types
//!
//! - [`PathSet`] - Non-empty set of repository paths parsed from a comma list
//! - [`Resolution`] - Conflict resolution strategy chosen by the user
//! - [`Oid`] - Git object identifier (SHA)
//!
//! # Examples
//!
//! ```
//! use gitutil::core::types::{PathSet, Resolution};
//!
//! let paths = PathSet::parse("src/main.rs,README.md").unwrap();
//! assert_eq!(paths.len(), 2);
//!
//! assert_eq!(Resolution::from_choice(3).unwrap(), Resolution::Both);
//! assert!(PathSet::parse(" , ").is_err());
//! ```

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("at least one file path is required")]
    EmptyPathSet,

    #[error("invalid choice '{0}': expected 1, 2 or 3")]
    InvalidChoice(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// A non-empty set of repository-relative paths.
///
/// Built from the comma-separated argument of `add` and `commit`.
/// Entries are trimmed; empty entries are dropped; duplicates collapse.
/// Iteration is sorted; staging order within the set carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet(BTreeSet<String>);

impl PathSet {
    /// Parse a comma-separated list of paths.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyPathSet` if no non-empty path remains.
    pub fn parse(list: &str) -> Result<Self, TypeError> {
        let paths: BTreeSet<String> = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if paths.is_empty() {
            return Err(TypeError::EmptyPathSet);
        }

        Ok(Self(paths))
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a set produced by [`PathSet::parse`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the paths.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PathSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.0.iter().cloned().collect::<Vec<_>>().join(", ");
        write!(f, "{}", joined)
    }
}

/// How to resolve every conflicted path in the working tree.
///
/// The numbering matches the interactive menu shown by `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Keep our side (`1`).
    Current,
    /// Take their side (`2`).
    Incoming,
    /// Write ours for every path, then theirs for every path (`3`).
    ///
    /// The second write wins, so each file ends up with the incoming content.
    Both,
}

impl Resolution {
    /// All strategies in menu order.
    pub const ALL: [Resolution; 3] = [Resolution::Current, Resolution::Incoming, Resolution::Both];

    /// Map a menu number to a strategy.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidChoice` for anything outside 1..=3.
    pub fn from_choice(choice: i64) -> Result<Self, TypeError> {
        match choice {
            1 => Ok(Resolution::Current),
            2 => Ok(Resolution::Incoming),
            3 => Ok(Resolution::Both),
            other => Err(TypeError::InvalidChoice(other.to_string())),
        }
    }

    /// Parse a line of user input into a strategy.
    pub fn parse_input(input: &str) -> Result<Self, TypeError> {
        let trimmed = input.trim();
        let choice: i64 = trimmed
            .parse()
            .map_err(|_| TypeError::InvalidChoice(trimmed.to_string()))?;
        Self::from_choice(choice)
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Current => "Accept current changes",
            Resolution::Incoming => "Accept incoming changes",
            Resolution::Both => "Accept both changes",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resolution::Current => "current",
            Resolution::Incoming => "incoming",
            Resolution::Both => "both",
        };
        write!(f, "{}", name)
    }
}

/// A Git object identifier.
///
/// # Example
///
/// ```
/// use gitutil::core::types::Oid;
///
/// let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// assert_eq!(oid.short(7), "abc123d");
/// assert!(Oid::new("not-a-sha").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id, normalized to lowercase.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Full hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the first `len` characters (or the whole id if shorter).
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(format!(
                "contains non-hex characters: {}",
                oid
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
