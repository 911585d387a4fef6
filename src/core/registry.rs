//! core::registry
//!
//! Registered commands and command-token resolution.
//!
//! # Resolution
//!
//! Names and aliases are flattened into one key space and matched the same
//! way:
//!
//! 1. A token equal to a key resolves to that key's command, even when it is
//!    also a prefix of other keys.
//! 2. Otherwise every key the token is a prefix of is collected. If those keys
//!    all belong to one command, it resolves; none is unknown; several
//!    commands is ambiguous.
//!
//! Resolution is set based, so registration order never changes the outcome.
//!
//! # Example
//!
//! ```
//! use toplevel::core::{CommandSpec, CommandProvider, Registry, ResolveError};
//! # use toplevel::core::{CommandInstance, Invocation};
//! # #[derive(Default)]
//! # struct Noop;
//! # impl CommandInstance for Noop {
//! #     fn run(&mut self, _: &mut Invocation<'_>) -> anyhow::Result<()> { Ok(()) }
//! # }
//!
//! let mut registry = Registry::new();
//! for name in ["debug", "degauss"] {
//!     let spec = CommandSpec::new(name, Vec::new(), "", CommandProvider::factory(|| Noop));
//!     registry.register(spec).unwrap();
//! }
//!
//! assert_eq!(registry.resolve("debu").unwrap().name(), "debug");
//! assert!(matches!(registry.resolve("de"), Err(ResolveError::Ambiguous { .. })));
//! assert!(matches!(registry.resolve("stop"), Err(ResolveError::Unknown(_))));
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;
use std::rc::Rc;

use thiserror::Error;

use super::command::{CommandInstance, SharedInstance};

/// Errors from registering commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command key '{key}' is already registered to '{existing}'")]
    Duplicate { key: String, existing: String },

    #[error("invalid command name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("unexpected trailing arguments: expected at most 2, got {0}")]
    ArgumentCount(usize),

    #[error("trailing argument {position} must be {expected}")]
    TrailingKind {
        position: usize,
        expected: &'static str,
    },
}

/// Errors from resolving a command token.
///
/// The messages double as the user-facing diagnostics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Ambiguous command '{token}'")]
    Ambiguous {
        token: String,
        /// Canonical names of every command the token could mean, sorted.
        candidates: Vec<String>,
    },
}

/// How a command instance is obtained for each dispatch.
pub enum CommandProvider {
    /// A new instance per dispatch.
    Factory(Box<dyn Fn() -> SharedInstance>),
    /// One instance, reused by every dispatch.
    Singleton(SharedInstance),
    /// A block command built from closures; reused like a singleton.
    Closures(SharedInstance),
}

impl CommandProvider {
    /// Provider that calls `factory` on every dispatch.
    pub fn factory<C, F>(factory: F) -> Self
    where
        C: CommandInstance + 'static,
        F: Fn() -> C + 'static,
    {
        CommandProvider::Factory(Box::new(move || -> SharedInstance {
            Rc::new(RefCell::new(factory()))
        }))
    }

    /// Provider that always hands out `instance`.
    pub fn singleton<C>(instance: Rc<RefCell<C>>) -> Self
    where
        C: CommandInstance + 'static,
    {
        CommandProvider::Singleton(instance)
    }

    /// Obtain the instance to dispatch to.
    pub fn produce(&self) -> SharedInstance {
        match self {
            CommandProvider::Factory(factory) => factory(),
            CommandProvider::Singleton(instance) | CommandProvider::Closures(instance) => {
                Rc::clone(instance)
            }
        }
    }
}

impl fmt::Debug for CommandProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            CommandProvider::Factory(_) => "Factory",
            CommandProvider::Singleton(_) => "Singleton",
            CommandProvider::Closures(_) => "Closures",
        };
        write!(f, "{kind}(..)")
    }
}

/// A registered command.
#[derive(Debug)]
pub struct CommandSpec {
    name: String,
    aliases: Vec<String>,
    description: String,
    provider: CommandProvider,
}

impl CommandSpec {
    pub fn new(
        name: impl Into<String>,
        aliases: Vec<String>,
        description: impl Into<String>,
        provider: CommandProvider,
    ) -> Self {
        Self {
            name: name.into(),
            aliases,
            description: description.into(),
            provider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn provider(&self) -> &CommandProvider {
        &self.provider
    }

    /// The name followed by every alias.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// `name, alias1, alias2` as shown in the commands listing.
    pub fn listing(&self) -> String {
        self.keys().collect::<Vec<_>>().join(", ")
    }
}

/// All commands known to a toplevel.
#[derive(Debug, Default)]
pub struct Registry {
    specs: Vec<CommandSpec>,
    keys: BTreeMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the name or an alias is empty or starts with `-`
    /// - `Duplicate` if the name or an alias already belongs to another command
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), RegistryError> {
        for key in spec.keys() {
            validate_key(key)?;
            if let Some(&existing) = self.keys.get(key) {
                return Err(RegistryError::Duplicate {
                    key: key.to_string(),
                    existing: self.specs[existing].name.clone(),
                });
            }
        }

        let index = self.specs.len();
        for key in spec.keys() {
            self.keys.insert(key.to_string(), index);
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Resolve a command token by exact or unambiguous prefix match.
    ///
    /// # Errors
    ///
    /// `Unknown` when nothing matches, `Ambiguous` when the token prefixes
    /// keys of more than one command.
    pub fn resolve(&self, token: &str) -> Result<&CommandSpec, ResolveError> {
        if let Some(&index) = self.keys.get(token) {
            return Ok(&self.specs[index]);
        }
        if token.is_empty() {
            return Err(ResolveError::Unknown(token.to_string()));
        }

        let matched: BTreeSet<usize> = self
            .keys
            .range::<str, _>((Bound::Included(token), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(token))
            .map(|(_, &index)| index)
            .collect();

        let mut indices = matched.iter();
        match (indices.next(), indices.next()) {
            (None, _) => Err(ResolveError::Unknown(token.to_string())),
            (Some(&index), None) => Ok(&self.specs[index]),
            (Some(_), Some(_)) => {
                let mut candidates: Vec<String> = matched
                    .iter()
                    .map(|&index| self.specs[index].name.clone())
                    .collect();
                candidates.sort();
                Err(ResolveError::Ambiguous {
                    token: token.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Look up a command by its exact name or alias.
    pub fn get(&self, key: &str) -> Option<&CommandSpec> {
        self.keys.get(key).map(|&index| &self.specs[index])
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn validate_key(key: &str) -> Result<(), RegistryError> {
    let reason = if key.is_empty() {
        "cannot be empty"
    } else if key.starts_with('-') {
        "cannot start with '-'"
    } else {
        return Ok(());
    };
    Err(RegistryError::InvalidName {
        name: key.to_string(),
        reason,
    })
}
