//! toplevel-demo
//!
//! A small program exercising every registration form.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction};

use toplevel::core::{CommandInstance, DispatchError, Invocation, DEFAULT_EXIT_CODE};
use toplevel::engine::Toplevel;
use toplevel::options::OptionSurface;
use toplevel::ui::output;

const PROGRAM: &str = "toplevel-demo";

/// Greets someone; built fresh for every dispatch.
#[derive(Default)]
struct Greet;

impl CommandInstance for Greet {
    fn define_parameters(&mut self, opts: &mut OptionSurface) {
        opts.on(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Who to greet"),
        );
    }

    fn usage_suffix(&self) -> Option<String> {
        Some("[WORDS...]".to_string())
    }

    fn run(&mut self, invocation: &mut Invocation<'_>) -> Result<()> {
        let name = invocation
            .get_one::<String>("name")
            .unwrap_or_else(|| "world".to_string());
        let mut line = format!("Hello, {name}!");
        for word in invocation.args() {
            line.push(' ');
            line.push_str(word);
        }
        writeln!(invocation.output(), "{line}")?;
        Ok(())
    }
}

/// Running total kept across dispatches.
#[derive(Default)]
struct Count {
    total: i64,
}

impl CommandInstance for Count {
    fn define_parameters(&mut self, opts: &mut OptionSurface) {
        opts.on(
            Arg::new("increment")
                .short('i')
                .long("increment")
                .value_name("INTEGER")
                .value_parser(value_parser!(i64))
                .help("Set increment amount"),
        );
    }

    fn run(&mut self, invocation: &mut Invocation<'_>) -> Result<()> {
        self.total += invocation.get_one::<i64>("increment").unwrap_or(1);
        writeln!(invocation.output(), "{}", self.total)?;
        Ok(())
    }
}

fn build() -> Result<Toplevel> {
    let count = Rc::new(RefCell::new(Count::default()));
    let toplevel = Toplevel::builder(PROGRAM, env!("CARGO_PKG_VERSION"))
        .commands(|reg| {
            reg.command("greet", Greet::default, (["hello"], "Print a greeting"))?
                .object_command("count", count, (["add"], "Add to a running total"))?
                .block_command("echo", "Print the arguments", |cmd| {
                    cmd.run(|invocation: &mut Invocation<'_>| {
                        let line = invocation.args().join(" ");
                        writeln!(invocation.output(), "{line}")?;
                        Ok(())
                    });
                })?
                .block_command("exit", "Fail with an exit code", |cmd| {
                    cmd.parms(|opts: &mut OptionSurface| {
                        opts.on(
                            Arg::new("code")
                                .short('c')
                                .long("code")
                                .value_name("INTEGER")
                                .value_parser(value_parser!(i32))
                                .allow_negative_numbers(true)
                                .help("Exit code to return"),
                        )
                        .on(
                            Arg::new("quiet-failure")
                                .long("quiet-failure")
                                .action(ArgAction::SetTrue)
                                .help("Do not print usage on failure"),
                        );
                    })
                    .run(|invocation: &mut Invocation<'_>| {
                        let code = invocation
                            .get_one::<i32>("code")
                            .unwrap_or(DEFAULT_EXIT_CODE);
                        let failure = DispatchError::new(format!("exiting with code {code}"))
                            .with_code(code)
                            .with_usage(!invocation.get_flag("quiet-failure"));
                        Err(failure.into())
                    });
                })?;
            Ok(())
        })?
        .build();
    Ok(toplevel)
}

fn main() {
    match build() {
        Ok(toplevel) => toplevel.run_and_exit(std::env::args().skip(1)),
        Err(err) => {
            output::error(format!("{err:#}"));
            std::process::exit(1);
        }
    }
}
