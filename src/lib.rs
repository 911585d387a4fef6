//! Toplevel - building blocks for `program <command> [options]` CLIs
//!
//! A program registers named commands (with aliases and a description), and
//! the dispatcher resolves the first positional argument to one of them by
//! exact name or unique prefix, parses the command's own options, and runs it.
//! Help output merges the global options, the command list and each command's
//! options; failures map to process exit codes.
//!
//! # Architecture
//!
//! - [`core`] - Command interface, registration and token resolution
//! - [`options`] - Option sets on top of clap, with ordered help rendering
//! - [`engine`] - The dispatcher and its context
//! - [`ui`] - Diagnostics and output capture
//!
//! # Invariants
//!
//! 1. A command token resolves to at most one command
//! 2. Exact names and aliases take precedence over prefix matches
//! 3. Only `DispatchError` is turned into an exit status; every other command
//!    failure propagates to the embedding program
//! 4. Dispatching never terminates the process unless `run_and_exit` is used

pub mod core;
pub mod engine;
pub mod options;
pub mod ui;

pub use crate::core::{CommandInstance, DispatchError, Invocation, Registrar};
pub use crate::engine::{Context, Status, Toplevel, ToplevelError};
pub use crate::options::OptionSurface;
