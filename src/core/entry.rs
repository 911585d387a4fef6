//! core::entry
//!
//! Registration surface handed to the toplevel's setup callback.
//!
//! # Forms
//!
//! - [`Registrar::command`]: a factory, called once per dispatch
//! - [`Registrar::object_command`]: a shared instance whose state persists
//!   across dispatches
//! - [`Registrar::block_command`]: a run closure plus an optional option
//!   closure and usage suffix
//!
//! # Aliases and description
//!
//! Every form takes [`Details`]. A bare string is the description; a pair is
//! `(aliases, description)`:
//!
//! ```
//! use toplevel::core::Details;
//!
//! let plain = Details::from("Stop the debugger");
//! assert!(plain.aliases().is_empty());
//!
//! let aliased = Details::from((["start", "go"], "Start the debugger"));
//! assert_eq!(aliased.aliases(), ["start", "go"]);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::command::{CommandInstance, Invocation};
use super::registry::{CommandProvider, CommandSpec, Registry, RegistryError};
use crate::options::OptionSurface;

/// One trailing registration argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trailing {
    Aliases(Vec<String>),
    Description(String),
}

impl From<&str> for Trailing {
    fn from(description: &str) -> Self {
        Trailing::Description(description.to_string())
    }
}

impl From<String> for Trailing {
    fn from(description: String) -> Self {
        Trailing::Description(description)
    }
}

impl From<Vec<String>> for Trailing {
    fn from(aliases: Vec<String>) -> Self {
        Trailing::Aliases(aliases)
    }
}

/// Aliases and description of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    aliases: Vec<String>,
    description: String,
}

impl Details {
    pub fn new<A, S>(aliases: A, description: impl Into<String>) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            description: description.into(),
        }
    }

    /// Interpret a positional trailing-argument list.
    ///
    /// With more than one argument the first is the alias list and the second
    /// the description; a single argument is the description.
    ///
    /// # Errors
    ///
    /// - `ArgumentCount` if arguments remain after those two
    /// - `TrailingKind` if a slot holds the wrong kind of argument
    ///
    /// # Example
    ///
    /// ```
    /// use toplevel::core::{Details, Trailing};
    ///
    /// let details = Details::from_trailing(vec![
    ///     Trailing::Aliases(vec!["go".into()]),
    ///     Trailing::from("Start the debugger"),
    /// ])
    /// .unwrap();
    /// assert_eq!(details.aliases(), ["go"]);
    ///
    /// let extra = vec![Trailing::from("a"), Trailing::from("b"), Trailing::from("c")];
    /// assert!(Details::from_trailing(extra).is_err());
    /// ```
    pub fn from_trailing(args: Vec<Trailing>) -> Result<Self, RegistryError> {
        let count = args.len();
        let mut args = args.into_iter();

        let aliases = if count > 1 {
            match args.next() {
                Some(Trailing::Aliases(aliases)) => aliases,
                _ => {
                    return Err(RegistryError::TrailingKind {
                        position: 0,
                        expected: "an alias list",
                    })
                }
            }
        } else {
            Vec::new()
        };

        let description = match args.next() {
            Some(Trailing::Description(description)) => description,
            Some(Trailing::Aliases(_)) => {
                return Err(RegistryError::TrailingKind {
                    position: count.min(2) - 1,
                    expected: "a description",
                })
            }
            None => String::new(),
        };

        if args.next().is_some() {
            return Err(RegistryError::ArgumentCount(count));
        }

        Ok(Self {
            aliases,
            description,
        })
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl From<&str> for Details {
    fn from(description: &str) -> Self {
        Details::new(Vec::<String>::new(), description)
    }
}

impl From<String> for Details {
    fn from(description: String) -> Self {
        Details::new(Vec::<String>::new(), description)
    }
}

impl<A, S, D> From<(A, D)> for Details
where
    A: IntoIterator<Item = S>,
    S: Into<String>,
    D: Into<String>,
{
    fn from((aliases, description): (A, D)) -> Self {
        Details::new(aliases, description)
    }
}

impl TryFrom<Vec<Trailing>> for Details {
    type Error = RegistryError;

    fn try_from(args: Vec<Trailing>) -> Result<Self, Self::Error> {
        Details::from_trailing(args)
    }
}

type RunBlock = Box<dyn FnMut(&mut Invocation<'_>) -> anyhow::Result<()>>;
type ParmsBlock = Box<dyn FnMut(&mut OptionSurface)>;

/// Collects the closures of a block command.
#[derive(Default)]
pub struct BlockCommandEntry {
    run: Option<RunBlock>,
    parms: Option<ParmsBlock>,
    usage_suffix: Option<String>,
}

impl BlockCommandEntry {
    /// Set the closure invoked when the command runs.
    pub fn run<F>(&mut self, block: F) -> &mut Self
    where
        F: FnMut(&mut Invocation<'_>) -> anyhow::Result<()> + 'static,
    {
        self.run = Some(Box::new(block));
        self
    }

    /// Set the closure that registers the command's options.
    pub fn parms<F>(&mut self, block: F) -> &mut Self
    where
        F: FnMut(&mut OptionSurface) + 'static,
    {
        self.parms = Some(Box::new(block));
        self
    }

    pub fn set_usage_suffix(&mut self, suffix: Option<String>) -> &mut Self {
        self.usage_suffix = suffix;
        self
    }

    pub fn usage_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.set_usage_suffix(Some(suffix.into()))
    }
}

/// A block command presented through the regular [`CommandInstance`] interface.
pub struct BlockCommand {
    run: Option<RunBlock>,
    parms: Option<ParmsBlock>,
    usage_suffix: Option<String>,
}

impl From<BlockCommandEntry> for BlockCommand {
    fn from(entry: BlockCommandEntry) -> Self {
        Self {
            run: entry.run,
            parms: entry.parms,
            usage_suffix: entry.usage_suffix,
        }
    }
}

impl CommandInstance for BlockCommand {
    fn define_parameters(&mut self, opts: &mut OptionSurface) {
        if let Some(parms) = self.parms.as_mut() {
            parms(opts);
        }
    }

    fn usage_suffix(&self) -> Option<String> {
        self.usage_suffix.clone()
    }

    fn run(&mut self, invocation: &mut Invocation<'_>) -> anyhow::Result<()> {
        match self.run.as_mut() {
            Some(run) => run(invocation),
            None => Ok(()),
        }
    }
}

/// Registration surface for the three command forms.
pub struct Registrar<'a> {
    registry: &'a mut Registry,
}

impl<'a> Registrar<'a> {
    pub fn new(registry: &'a mut Registry) -> Self {
        Self { registry }
    }

    /// Register a command built fresh by `factory` for every dispatch.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the name or an alias is invalid or taken.
    pub fn command<C, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
        details: impl Into<Details>,
    ) -> Result<&mut Self, RegistryError>
    where
        C: CommandInstance + 'static,
        F: Fn() -> C + 'static,
    {
        self.register(name.into(), details.into(), CommandProvider::factory(factory))
    }

    /// Register a shared instance, reused for every dispatch.
    ///
    /// Keep a clone of the `Rc` to observe the instance's state afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the name or an alias is invalid or taken.
    pub fn object_command<C>(
        &mut self,
        name: impl Into<String>,
        instance: Rc<RefCell<C>>,
        details: impl Into<Details>,
    ) -> Result<&mut Self, RegistryError>
    where
        C: CommandInstance + 'static,
    {
        self.register(name.into(), details.into(), CommandProvider::singleton(instance))
    }

    /// Register a command defined by closures.
    ///
    /// `define` receives a [`BlockCommandEntry`] to attach the run closure,
    /// the option closure and the usage suffix.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the name or an alias is invalid or taken.
    pub fn block_command<F>(
        &mut self,
        name: impl Into<String>,
        details: impl Into<Details>,
        define: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: FnOnce(&mut BlockCommandEntry),
    {
        let mut entry = BlockCommandEntry::default();
        define(&mut entry);
        let command = BlockCommand::from(entry);
        self.register(
            name.into(),
            details.into(),
            CommandProvider::Closures(Rc::new(RefCell::new(command))),
        )
    }

    fn register(
        &mut self,
        name: String,
        details: Details,
        provider: CommandProvider,
    ) -> Result<&mut Self, RegistryError> {
        let Details {
            aliases,
            description,
        } = details;
        self.registry
            .register(CommandSpec::new(name, aliases, description, provider))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Context;

    fn trailing(args: &[Trailing]) -> Result<Details, RegistryError> {
        Details::from_trailing(args.to_vec())
    }

    #[test]
    fn single_trailing_is_description() {
        let details = trailing(&[Trailing::from("Stop the debugger")]).unwrap();
        assert!(details.aliases().is_empty());
        assert_eq!(details.description(), "Stop the debugger");
    }

    #[test]
    fn two_trailing_are_aliases_then_description() {
        let details = trailing(&[
            Trailing::Aliases(vec!["start_debugging".into()]),
            Trailing::from("Start the debugger"),
        ])
        .unwrap();
        assert_eq!(details.aliases(), ["start_debugging"]);
        assert_eq!(details.description(), "Start the debugger");
    }

    #[test]
    fn no_trailing_is_empty() {
        assert_eq!(trailing(&[]).unwrap(), Details::default());
    }

    #[test]
    fn extra_trailing_is_argument_count_error() {
        let err = trailing(&[
            Trailing::Aliases(vec![]),
            Trailing::from("one"),
            Trailing::from("two"),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::ArgumentCount(3));
    }

    #[test]
    fn misplaced_kinds_are_rejected() {
        assert_eq!(
            trailing(&[Trailing::from("desc"), Trailing::from("desc")]).unwrap_err(),
            RegistryError::TrailingKind {
                position: 0,
                expected: "an alias list",
            }
        );
        assert_eq!(
            trailing(&[Trailing::Aliases(vec!["a".into()])]).unwrap_err(),
            RegistryError::TrailingKind {
                position: 0,
                expected: "a description",
            }
        );
        assert!(Details::try_from(vec![
            Trailing::Aliases(vec![]),
            Trailing::Aliases(vec![]),
        ])
        .is_err());
    }

    #[test]
    fn registrar_chains_all_forms() {
        struct Noop;
        impl CommandInstance for Noop {
            fn run(&mut self, _: &mut Invocation<'_>) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let mut registry = Registry::new();
        let shared = Rc::new(RefCell::new(Noop));
        Registrar::new(&mut registry)
            .command("debug", || Noop, (["go"], "Start the debugger"))
            .unwrap()
            .object_command("stop", shared, "Stop the debugger")
            .unwrap()
            .block_command("step", "Single step", |cmd| {
                cmd.usage_suffix("COUNT");
            })
            .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("go").unwrap().name(), "debug");
        assert_eq!(registry.get("stop").unwrap().description(), "Stop the debugger");
        let step = registry.get("step").unwrap().provider().produce();
        assert_eq!(step.borrow().usage_suffix().as_deref(), Some("COUNT"));
    }

    #[test]
    fn block_command_forwards_closures() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut entry = BlockCommandEntry::default();
        let sink = Rc::clone(&seen);
        entry
            .run(move |invocation| {
                sink.borrow_mut().extend(invocation.args().iter().cloned());
                Ok(())
            })
            .parms(|opts| {
                opts.separator("Extra:");
            });
        let mut command = BlockCommand::from(entry);

        let mut surface = OptionSurface::new();
        command.define_parameters(&mut surface);
        assert_eq!(surface.ops().len(), 1);
        assert_eq!(command.usage_suffix(), None);

        let matches = clap::Command::new("t")
            .no_binary_name(true)
            .try_get_matches_from(Vec::<String>::new())
            .unwrap();
        let context = Context::default();
        let mut out = Vec::new();
        let mut invocation = Invocation::new(
            vec!["x".into(), "y".into()],
            &matches,
            &context,
            &mut out,
        );
        command.run(&mut invocation).unwrap();
        assert_eq!(*seen.borrow(), ["x", "y"]);
    }

    #[test]
    fn block_command_without_run_is_a_no_op() {
        let mut command = BlockCommand::from(BlockCommandEntry::default());
        let matches = clap::Command::new("t")
            .no_binary_name(true)
            .try_get_matches_from(Vec::<String>::new())
            .unwrap();
        let context = Context::default();
        let mut out = Vec::new();
        let mut invocation = Invocation::new(Vec::new(), &matches, &context, &mut out);
        assert!(command.run(&mut invocation).is_ok());
    }
}
