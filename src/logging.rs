//! logging
//!
//! Diagnostic logging setup.
//!
//! Diagnostics go through `tracing` to stderr. Command results meant for
//! the user go to stdout through [`crate::ui::output`] instead.

use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Default level for the given global flags.
///
/// `--quiet` wins over `--debug`.
pub fn default_level(debug: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(debug: bool, quiet: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(debug, quiet).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(debug)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_flags() {
        assert_eq!(default_level(false, false), LevelFilter::INFO);
        assert_eq!(default_level(true, false), LevelFilter::DEBUG);
        assert_eq!(default_level(false, true), LevelFilter::ERROR);
        assert_eq!(default_level(true, true), LevelFilter::ERROR);
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false, false);
        init(true, false);
    }
}
