//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Command results go to stdout and respect the quiet flag. Errors and
//! warnings are not printed here; they go through `tracing`.

use std::fmt::Display;
use std::io::{self, Write};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a result the user explicitly asked for (shown even in quiet mode).
pub fn emit(message: impl Display) {
    println!("{}", message);
}

/// Format a heading followed by one item per line.
pub fn format_section<'a, I>(heading: &str, items: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = String::from(heading);
    for item in items {
        out.push('\n');
        out.push_str(item);
    }
    out
}

/// Flush stdout before reading input on the same terminal.
pub fn flush() {
    let _ = io::stdout().flush();
}
