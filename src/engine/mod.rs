//! engine
//!
//! Orchestrates a dispatch: global options -> command resolution -> command
//! options -> run -> error mapping.
//!
//! # Architecture
//!
//! [`Toplevel`] owns the command registry, the output sink and the
//! [`Context`]. Each call to [`Toplevel::parse`] goes through two phases:
//!
//! 1. **Global**: common options are parsed up to the first positional, which
//!    is taken as the command token and resolved against the registry
//! 2. **Command**: a parser is assembled from the command's own options plus
//!    the common options, and the command runs with what remains
//!
//! ```text
//! parse(args) -> global options -> resolve -> command options -> run -> Status
//! ```
//!
//! # Invariants
//!
//! - `parse` never exits the process; terminating outcomes are returned as
//!   [`Status::Exit`]
//! - Only [`DispatchError`](crate::core::DispatchError) is recovered from a
//!   command; every other error propagates as [`ToplevelError::Command`]
//! - Exit codes are carried as `i32` without truncation

pub mod toplevel;

mod common;

pub use toplevel::{Toplevel, ToplevelBuilder};

use crate::ui::output::Verbosity;

/// Global switches shared by the toplevel and its commands.
///
/// Set by `--[no-]debug` and `-v`/`--[no-]verbose`. Values persist across
/// `parse` calls on the same toplevel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// Debugging output enabled.
    pub debug: bool,
    /// Extra output enabled.
    pub verbose: bool,
}

impl Context {
    /// Diagnostic verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.debug)
    }
}

/// How a dispatch finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Status {
    /// The command ran to completion.
    Ran,
    /// The process should terminate with this code.
    Exit(i32),
}

impl Status {
    /// Process exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            Status::Ran => 0,
            Status::Exit(code) => code,
        }
    }

    pub fn is_exit(self) -> bool {
        matches!(self, Status::Exit(_))
    }
}

/// Errors that abort a dispatch.
#[derive(Debug, thiserror::Error)]
pub enum ToplevelError {
    /// Options could not be parsed.
    #[error("{}", first_line(.0))]
    Options(#[from] clap::Error),

    /// The command failed with something other than a `DispatchError`.
    #[error(transparent)]
    Command(#[from] anyhow::Error),

    /// Writing to the output sink failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// First line of a clap error, without clap's own `error: ` prefix.
fn first_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(Status::Ran.code(), 0);
        assert_eq!(Status::Exit(-1).code(), -1);
        assert_eq!(Status::Exit(32).code(), 32);
        assert!(!Status::Ran.is_exit());
        assert!(Status::Exit(0).is_exit());
    }

    #[test]
    fn context_verbosity() {
        assert_eq!(Context::default().verbosity(), Verbosity::Normal);
        let ctx = Context {
            debug: true,
            verbose: false,
        };
        assert_eq!(ctx.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn options_error_is_one_line() {
        let err = clap::Command::new("t")
            .no_binary_name(true)
            .try_get_matches_from(["--bogus"])
            .unwrap_err();
        let message = ToplevelError::from(err).to_string();
        assert!(!message.contains('\n'));
        assert!(!message.starts_with("error:"));
        assert!(message.contains("--bogus"));
    }
}
