//! core
//!
//! Commands, their registration, and command-token resolution.
//!
//! # Modules
//!
//! - [`command`] - The `CommandInstance` interface and `DispatchError`
//! - [`registry`] - Registered commands and prefix/alias resolution
//! - [`entry`] - The `Registrar` used to define commands at construction
//!
//! # Design Principles
//!
//! - Commands are pluggable; the dispatcher only sees `CommandInstance`
//! - Registration errors surface at startup, never mid-dispatch
//! - Resolution is deterministic and independent of registration order

pub mod command;
pub mod entry;
pub mod registry;

pub use command::{CommandInstance, DispatchError, Invocation, SharedInstance, DEFAULT_EXIT_CODE};
pub use entry::{BlockCommand, BlockCommandEntry, Details, Registrar, Trailing};
pub use registry::{CommandProvider, CommandSpec, Registry, RegistryError, ResolveError};
