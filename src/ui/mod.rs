//! ui
//!
//! Output utilities.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-gated diagnostics on stderr
//! - [`capture`] - In-memory output sink for embedding and tests
//!
//! # Design
//!
//! User-facing text (help, version, diagnostics about the command line) goes
//! to the toplevel's output sink. Everything else goes through [`output`].

pub mod capture;
pub mod output;

pub use capture::OutputBuffer;
