//! core::command
//!
//! The interface every dispatched command implements.
//!
//! # Capabilities
//!
//! Only [`CommandInstance::run`] is required. Option definition and the
//! usage suffix are default methods; a command that does not override them
//! simply has no options and no suffix.
//!
//! # Failures
//!
//! `run` returns `anyhow::Result<()>`. A [`DispatchError`] anywhere in the
//! error chain is a normal, user-facing failure: the dispatcher reports it and
//! finishes with its exit code. Every other error propagates to the caller.
//!
//! # Example
//!
//! ```
//! use clap::{value_parser, Arg};
//! use toplevel::core::{CommandInstance, DispatchError, Invocation};
//! use toplevel::options::OptionSurface;
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! impl CommandInstance for Counter {
//!     fn define_parameters(&mut self, opts: &mut OptionSurface) {
//!         opts.on(
//!             Arg::new("by")
//!                 .long("by")
//!                 .value_name("INTEGER")
//!                 .value_parser(value_parser!(i64))
//!                 .help("Step size"),
//!         );
//!     }
//!
//!     fn run(&mut self, invocation: &mut Invocation<'_>) -> anyhow::Result<()> {
//!         let by = invocation.get_one::<i64>("by").unwrap_or(1);
//!         if by == 0 {
//!             return Err(DispatchError::new("step must be non-zero").into());
//!         }
//!         self.value += by;
//!         Ok(())
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use clap::ArgMatches;
use thiserror::Error;

use crate::engine::Context;
use crate::options::OptionSurface;

/// Exit code used when a [`DispatchError`] does not specify one.
pub const DEFAULT_EXIT_CODE: i32 = -1;

/// A command instance shared between the registry and the dispatcher.
pub type SharedInstance = Rc<RefCell<dyn CommandInstance>>;

/// A runnable command.
pub trait CommandInstance {
    /// Register command-specific options.
    fn define_parameters(&mut self, _opts: &mut OptionSurface) {}

    /// Text appended to the usage banner, e.g. `FILES`.
    fn usage_suffix(&self) -> Option<String> {
        None
    }

    /// Execute the command.
    fn run(&mut self, invocation: &mut Invocation<'_>) -> anyhow::Result<()>;
}

/// Everything a command sees when it runs.
pub struct Invocation<'a> {
    args: Vec<String>,
    matches: &'a ArgMatches,
    context: &'a Context,
    output: &'a mut dyn Write,
}

impl<'a> Invocation<'a> {
    pub fn new(
        args: Vec<String>,
        matches: &'a ArgMatches,
        context: &'a Context,
        output: &'a mut dyn Write,
    ) -> Self {
        Self {
            args,
            matches,
            context,
            output,
        }
    }

    /// Positional arguments left after option parsing.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Raw matches for the command's options.
    pub fn matches(&self) -> &ArgMatches {
        self.matches
    }

    /// Value of a valued option, if given.
    ///
    /// Returns `None` for unknown ids and type mismatches rather than
    /// panicking.
    pub fn get_one<T>(&self, id: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.matches.try_get_one::<T>(id).ok().flatten().cloned()
    }

    /// Whether a boolean switch was set.
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).unwrap_or(false)
    }

    /// Debug/verbose state of the toplevel.
    pub fn context(&self) -> &Context {
        self.context
    }

    /// The toplevel's output sink.
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }
}

/// A recoverable command failure.
///
/// Carries the exit code the process should finish with and whether the
/// command's usage should be printed after the message. Exit codes are not
/// restricted to `0..=255`; negative codes are reported unchanged.
///
/// # Example
///
/// ```
/// use toplevel::core::DispatchError;
///
/// let err = DispatchError::new("bad state").with_code(32);
/// assert_eq!(err.to_string(), "bad state");
/// assert_eq!(err.exit_code(), 32);
/// assert!(err.show_usage());
///
/// let quiet = DispatchError::new("bad action").with_code(11).with_usage(false);
/// assert!(!quiet.show_usage());
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DispatchError {
    message: String,
    exit_code: i32,
    show_usage: bool,
}

impl DispatchError {
    /// Failure with exit code -1 that shows usage.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: DEFAULT_EXIT_CODE,
            show_usage: true,
        }
    }

    pub fn with_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_usage(mut self, show_usage: bool) -> Self {
        self.show_usage = show_usage;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn show_usage(&self) -> bool {
        self.show_usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn defaults_match_usage_failure() {
        let err = DispatchError::new("oops");
        assert_eq!(err.exit_code(), -1);
        assert!(err.show_usage());
        assert_eq!(err.message(), "oops");
    }

    #[test]
    fn survives_anyhow_context() {
        let result: anyhow::Result<()> = Err(DispatchError::new("inner").with_code(7))
            .context("while doing something");
        let err = result.unwrap_err();
        let dispatch = err.downcast_ref::<DispatchError>().unwrap();
        assert_eq!(dispatch.exit_code(), 7);
    }

    #[test]
    fn invocation_accessors_tolerate_unknown_ids() {
        let matches = clap::Command::new("t")
            .no_binary_name(true)
            .try_get_matches_from(Vec::<String>::new())
            .unwrap();
        let context = Context::default();
        let mut sink = Vec::new();
        let mut invocation =
            Invocation::new(vec!["a".into()], &matches, &context, &mut sink);

        assert_eq!(invocation.args(), ["a".to_string()]);
        assert_eq!(invocation.get_one::<i64>("missing"), None);
        assert!(!invocation.get_flag("missing"));
        writeln!(invocation.output(), "hello").unwrap();
        assert_eq!(sink, b"hello\n");
    }
}
