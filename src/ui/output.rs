//! ui::output
//!
//! Diagnostic output.
//!
//! # Design
//!
//! Diagnostics go to stderr so the toplevel's output sink carries only
//! user-facing text (help, version, command output). Debug and info lines
//! are gated on the [`Verbosity`] derived from `--debug` and `--verbose`.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Normal mode - standard output
    Normal,
    /// Verbose mode - extra output
    Verbose,
    /// Debug mode - everything
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. Debug wins over verbose.
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an informational message (verbose or debug mode).
pub fn info(message: impl Display, verbosity: Verbosity) {
    if verbosity >= Verbosity::Verbose {
        eprintln!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}
