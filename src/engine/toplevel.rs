//! engine::toplevel
//!
//! The command dispatcher.
//!
//! # Example
//!
//! ```
//! use toplevel::core::{DispatchError, Invocation};
//! use toplevel::engine::{Status, Toplevel};
//! use toplevel::ui::OutputBuffer;
//!
//! let output = OutputBuffer::new();
//! let mut tl = Toplevel::builder("tool", "1.0")
//!     .output(output.clone())
//!     .commands(|reg| {
//!         reg.block_command("debug", (["go"], "Start the debugger"), |cmd| {
//!             cmd.run(|inv: &mut Invocation<'_>| {
//!                 if inv.args().is_empty() {
//!                     return Err(DispatchError::new("nothing to debug").with_code(3).into());
//!                 }
//!                 Ok(())
//!             });
//!         })?;
//!         Ok(())
//!     })
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(tl.parse(["deb", "core"]).unwrap(), Status::Ran);
//! assert_eq!(tl.parse(["go"]).unwrap(), Status::Exit(3));
//! assert!(output.contents().starts_with("Error: nothing to debug\n"));
//! ```

use std::io::{self, Write};

use super::common::{common_options, CommonFlags, Request};
use super::{Context, Status, ToplevelError};
use crate::core::{
    DispatchError, Invocation, Registrar, Registry, RegistryError, SharedInstance,
    DEFAULT_EXIT_CODE,
};
use crate::options::{help::summary_line, OptionSet, OptionSurface};
use crate::ui::output;

/// Builder for a [`Toplevel`].
pub struct ToplevelBuilder {
    name: String,
    version: String,
    output: Option<Box<dyn Write>>,
    registry: Registry,
    context: Context,
}

impl ToplevelBuilder {
    /// Send help, version and diagnostics to `output` instead of stdout.
    pub fn output(mut self, output: impl Write + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Initial debug/verbose state.
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Define commands through a [`Registrar`].
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] raised by `define`.
    pub fn commands<F>(mut self, define: F) -> Result<Self, RegistryError>
    where
        F: FnOnce(&mut Registrar<'_>) -> Result<(), RegistryError>,
    {
        define(&mut Registrar::new(&mut self.registry))?;
        Ok(self)
    }

    pub fn build(self) -> Toplevel {
        Toplevel {
            name: self.name,
            version: self.version,
            output: self.output.unwrap_or_else(|| Box::new(io::stdout())),
            registry: self.registry,
            context: self.context,
        }
    }
}

/// A program with `program [global-options] <command> [options]` dispatch.
pub struct Toplevel {
    name: String,
    version: String,
    output: Box<dyn Write>,
    registry: Registry,
    context: Context,
}

impl Toplevel {
    /// A toplevel with no commands, writing to stdout.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::builder(name, version).build()
    }

    /// A toplevel with no commands, writing to `output`.
    pub fn with_output(
        name: impl Into<String>,
        version: impl Into<String>,
        output: impl Write + 'static,
    ) -> Self {
        Self::builder(name, version).output(output).build()
    }

    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> ToplevelBuilder {
        ToplevelBuilder {
            name: name.into(),
            version: version.into(),
            output: None,
            registry: Registry::new(),
            context: Context::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `<name>: <version>`, as printed by `--version`.
    pub fn version_string(&self) -> String {
        format!("{}: {}", self.name, self.version)
    }

    /// `<name> [global-options] <command> [options]`.
    pub fn usage_string(&self, command: &str) -> String {
        format!("{} [global-options] {} [options]", self.name, command)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The global help screen.
    pub fn help(&self) -> String {
        self.global_options().help()
    }

    /// Dispatch one command line (without the program name).
    ///
    /// # Errors
    ///
    /// - [`ToplevelError::Options`] for unknown switches or bad option values
    /// - [`ToplevelError::Command`] when a command fails with anything other
    ///   than a [`DispatchError`]
    /// - [`ToplevelError::Output`] when the output sink fails
    pub fn parse<I, S>(&mut self, args: I) -> Result<Status, ToplevelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let options = self.global_options();
        let parsed = options.parse(&self.name, &args)?;
        if let Some(status) = self.apply_common(&parsed.matches, &options)? {
            return Ok(status);
        }

        let mut remainder = parsed.remainder.into_iter();
        let Some(token) = remainder.next() else {
            writeln!(self.output, "No command provided")?;
            return self.usage_and_exit(&options, DEFAULT_EXIT_CODE);
        };

        let resolved = self
            .registry
            .resolve(&token)
            .map(|spec| (spec.name().to_string(), spec.provider().produce()));
        let (name, instance) = match resolved {
            Ok(found) => found,
            Err(err) => {
                output::debug(format!("{err:?}"), self.context.verbosity());
                writeln!(self.output, "{err}")?;
                return self.usage_and_exit(&options, DEFAULT_EXIT_CODE);
            }
        };
        output::debug(
            format!("'{token}' resolved to '{name}'"),
            self.context.verbosity(),
        );

        self.dispatch(&name, instance, remainder.collect())
    }

    /// Dispatch `args` and terminate the process with the resulting code.
    ///
    /// Fatal errors are reported on stderr and exit with code 1. Exit codes
    /// outside `0..=255` are truncated by the operating system on Unix.
    pub fn run_and_exit<I, S>(mut self, args: I) -> !
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let code = match self.parse(args) {
            Ok(status) => status.code(),
            Err(err) => {
                output::error(&err);
                1
            }
        };
        // The process is going away; a failed flush has nowhere to be reported.
        let _ = self.output.flush();
        std::process::exit(code)
    }

    fn dispatch(
        &mut self,
        name: &str,
        instance: SharedInstance,
        args: Vec<String>,
    ) -> Result<Status, ToplevelError> {
        let mut instance = instance.borrow_mut();

        let suffix = instance
            .usage_suffix()
            .map(|suffix| format!(" {suffix}"))
            .unwrap_or_default();
        let mut options = OptionSet::new(format!("Usage: {}{}", self.usage_string(name), suffix));

        let mut surface = OptionSurface::new();
        instance.define_parameters(&mut surface);
        if surface.defines_options() {
            options
                .separator("")
                .separator(format!("{} command options:", capitalize(name)));
        }
        surface.replay(&mut options);
        common_options(&mut options);

        let parsed = options.parse(&self.name, &args)?;
        if let Some(status) = self.apply_common(&parsed.matches, &options)? {
            return Ok(status);
        }

        output::debug(
            format!("running '{}' with {:?}", name, parsed.remainder),
            self.context.verbosity(),
        );
        let result = {
            let mut invocation = Invocation::new(
                parsed.remainder,
                &parsed.matches,
                &self.context,
                &mut *self.output,
            );
            instance.run(&mut invocation)
        };

        match result {
            Ok(()) => Ok(Status::Ran),
            Err(err) => match dispatch_failure(&err) {
                Some(failure) => {
                    output::info(
                        format!("'{}' failed with exit code {}", name, failure.exit_code()),
                        self.context.verbosity(),
                    );
                    writeln!(self.output, "Error: {}", failure.message())?;
                    if failure.show_usage() {
                        write!(self.output, "{}", options.help())?;
                    }
                    Ok(Status::Exit(failure.exit_code()))
                }
                None => Err(ToplevelError::Command(err)),
            },
        }
    }

    /// Apply common options; returns the status if help or version was requested.
    fn apply_common(
        &mut self,
        matches: &clap::ArgMatches,
        options: &OptionSet,
    ) -> Result<Option<Status>, ToplevelError> {
        let flags = CommonFlags::from_matches(matches);
        flags.apply(&mut self.context);

        match flags.request {
            Some(Request::Help) => self.usage_and_exit(options, 0).map(Some),
            Some(Request::Version) => {
                writeln!(self.output, "{}", self.version_string())?;
                Ok(Some(Status::Exit(0)))
            }
            None => Ok(None),
        }
    }

    fn usage_and_exit(&mut self, options: &OptionSet, code: i32) -> Result<Status, ToplevelError> {
        write!(self.output, "{}", options.help())?;
        Ok(Status::Exit(code))
    }

    fn global_options(&self) -> OptionSet {
        let mut options = OptionSet::new(format!("Usage: {}", self.usage_string("command")));
        if !self.registry.is_empty() {
            options.separator("").separator("Commands:");
            for spec in self.registry.iter() {
                options.separator(summary_line(&spec.listing(), spec.description()));
            }
        }
        common_options(&mut options);
        options
    }
}

/// The first `DispatchError` in the error's chain of causes.
fn dispatch_failure(err: &anyhow::Error) -> Option<DispatchError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DispatchError>())
        .cloned()
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputBuffer;

    #[test]
    fn capitalize_names() {
        assert_eq!(capitalize("debug"), "Debug");
        assert_eq!(capitalize("DEBUG"), "Debug");
        assert_eq!(capitalize("start_debugging"), "Start_debugging");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn strings() {
        let tl = Toplevel::new("my name", "version-string");
        assert_eq!(tl.version_string(), "my name: version-string");
        assert_eq!(tl.usage_string("debug"), "my name [global-options] debug [options]");
        assert_eq!(tl.name(), "my name");
        assert_eq!(tl.version(), "version-string");
    }

    #[test]
    fn global_help_without_commands() {
        let tl = Toplevel::new("name", "1.0");
        let help = tl.help();
        assert!(help.starts_with("Usage: name [global-options] command [options]\n\nCommon options:\n"));
        assert!(!help.contains("Commands:"));
    }

    #[test]
    fn global_help_lists_commands_in_registration_order() {
        let tl = Toplevel::builder("name", "1.0")
            .commands(|reg| {
                reg.block_command("stop", "Stop the debugger", |_| {})?
                    .block_command("debug", (["start_debugging"], "Start the debugger"), |_| {})?;
                Ok(())
            })
            .unwrap()
            .build();
        let help = tl.help();
        let expected = "\
Usage: name [global-options] command [options]

Commands:
    stop                             Stop the debugger
    debug, start_debugging           Start the debugger

Common options:
";
        assert!(help.starts_with(expected), "{help}");
    }

    #[test]
    fn seeded_context_is_kept_until_toggled() {
        let output = OutputBuffer::new();
        let mut tl = Toplevel::builder("name", "1.0")
            .output(output.clone())
            .context(Context {
                debug: false,
                verbose: true,
            })
            .build();
        assert_eq!(tl.parse(["--debug"]).unwrap(), Status::Exit(-1));
        assert_eq!(
            *tl.context(),
            Context {
                debug: true,
                verbose: true,
            }
        );
    }
}
