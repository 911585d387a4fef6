//! options
//!
//! Option definitions, help layout and parsing.
//!
//! # Overview
//!
//! Parsing is delegated to clap's builder API. This module adds what clap
//! does not provide in the required shape:
//!
//! - [`OptionSet`]: switches plus free-form separators, rendered in
//!   registration order under a banner
//! - [`OptionSurface`]: the deferred buffer handed to commands
//!
//! Parsing follows "in order" semantics: switches are consumed until the
//! first positional token, and everything from there on is returned
//! untouched as the remainder.

pub mod help;
pub mod surface;

pub use help::HelpEntry;
pub use surface::{OptionSurface, SurfaceOp};

use clap::{value_parser, Arg, ArgAction, ArgMatches};

/// Argument id collecting the unparsed remainder.
const REMAINDER: &str = "toplevel-remainder";

/// Where a switch lands in the help screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly after the banner.
    Head,
    /// In registration order with separators.
    Body,
    /// After everything else.
    Tail,
}

/// Result of parsing tokens against an [`OptionSet`].
#[derive(Debug, Clone)]
pub struct ParsedOptions {
    /// Matches for the registered switches.
    pub matches: ArgMatches,
    /// Tokens from the first positional onwards.
    pub remainder: Vec<String>,
}

/// A parser definition: banner, help entries and the clap arguments behind them.
#[derive(Debug, Clone)]
pub struct OptionSet {
    banner: String,
    head: Vec<HelpEntry>,
    body: Vec<HelpEntry>,
    tail: Vec<HelpEntry>,
    args: Vec<Arg>,
}

impl OptionSet {
    /// Create an option set with the given banner line.
    pub fn new(banner: impl Into<String>) -> Self {
        Self {
            banner: banner.into(),
            head: Vec::new(),
            body: Vec::new(),
            tail: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    /// Register a switch in the body.
    pub fn on(&mut self, arg: Arg) -> &mut Self {
        self.place(Placement::Body, arg)
    }

    /// Register a switch at the top of the help screen.
    pub fn on_head(&mut self, arg: Arg) -> &mut Self {
        self.place(Placement::Head, arg)
    }

    /// Register a switch at the end of the help screen.
    pub fn on_tail(&mut self, arg: Arg) -> &mut Self {
        self.place(Placement::Tail, arg)
    }

    /// Add a free-form line to the body.
    pub fn separator(&mut self, text: impl Into<String>) -> &mut Self {
        self.body.push(HelpEntry::separator(text));
        self
    }

    /// Register one help entry backed by any number of clap arguments.
    ///
    /// Used for switches whose help line does not map one-to-one onto a
    /// clap argument, such as `--[no-]debug`.
    ///
    /// A switch registered later takes over any short or long flag already
    /// claimed by an earlier one.
    pub fn switch(
        &mut self,
        placement: Placement,
        entry: HelpEntry,
        args: impl IntoIterator<Item = Arg>,
    ) -> &mut Self {
        self.section(placement).push(entry);
        for arg in args {
            self.release_flags(&arg);
            self.args.push(arg);
        }
        self
    }

    /// Number of clap arguments registered.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Render the full help screen.
    pub fn help(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.banner);
        out.push('\n');
        for entry in self.head.iter().chain(&self.body).chain(&self.tail) {
            entry.render_into(&mut out);
        }
        out
    }

    /// Parse `tokens`, stopping at the first positional.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown switches, missing values and
    /// values that fail their value parser.
    pub fn parse(&self, program: &str, tokens: &[String]) -> Result<ParsedOptions, clap::Error> {
        let command = clap::Command::new(program.to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .args(self.args.iter().cloned())
            .arg(
                Arg::new(REMAINDER)
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .trailing_var_arg(true)
                    .value_parser(value_parser!(String)),
            );

        let matches = command.try_get_matches_from(tokens.iter())?;
        let remainder = matches
            .get_many::<String>(REMAINDER)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(ParsedOptions { matches, remainder })
    }

    /// Strip the flags `incoming` uses from earlier arguments. An argument
    /// left with neither a short nor a long flag is dropped.
    fn release_flags(&mut self, incoming: &Arg) {
        let short = incoming.get_short();
        let long = incoming.get_long();
        self.args = std::mem::take(&mut self.args)
            .into_iter()
            .filter_map(|mut arg| {
                let mut released = false;
                if short.is_some() && arg.get_short() == short {
                    arg = arg.short(None::<char>);
                    released = true;
                }
                if long.is_some() && arg.get_long() == long {
                    arg = arg.long(None::<&'static str>);
                    released = true;
                }
                let reachable = arg.get_short().is_some() || arg.get_long().is_some();
                (!released || reachable).then_some(arg)
            })
            .collect();
    }

    fn place(&mut self, placement: Placement, arg: Arg) -> &mut Self {
        let entry = HelpEntry::for_arg(&arg);
        self.switch(placement, entry, [arg])
    }

    fn section(&mut self, placement: Placement) -> &mut Vec<HelpEntry> {
        match placement {
            Placement::Head => &mut self.head,
            Placement::Body => &mut self.body,
            Placement::Tail => &mut self.tail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> OptionSet {
        let mut set = OptionSet::new("Usage: tool [options]");
        set.on(
            Arg::new("parm")
                .short('p')
                .long("parm-value")
                .value_name("INTEGER")
                .value_parser(value_parser!(i64))
                .help("Set the parm value"),
        )
        .on(Arg::new("all")
            .short('a')
            .long("all")
            .action(ArgAction::SetTrue)
            .help("Everything"));
        set
    }

    #[test]
    fn parse_typed_value() {
        let parsed = sample().parse("tool", &tokens(&["-p", "77"])).unwrap();
        assert_eq!(parsed.matches.get_one::<i64>("parm"), Some(&77));
        assert!(parsed.remainder.is_empty());
    }

    #[test]
    fn parse_stops_at_first_positional() {
        let parsed = sample()
            .parse("tool", &tokens(&["-a", "file", "-p", "3", "--help"]))
            .unwrap();
        assert!(parsed.matches.get_flag("all"));
        assert_eq!(parsed.matches.get_one::<i64>("parm"), None);
        assert_eq!(parsed.remainder, tokens(&["file", "-p", "3", "--help"]));
    }

    #[test]
    fn parse_rejects_bad_integer() {
        let err = sample()
            .parse("tool", &tokens(&["--parm-value", "lots"]))
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parse_rejects_unknown_switch() {
        let err = sample().parse("tool", &tokens(&["--nope"])).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn repeated_flags_are_accepted() {
        let parsed = sample().parse("tool", &tokens(&["-a", "-a"])).unwrap();
        assert!(parsed.matches.get_flag("all"));
    }

    #[test]
    fn later_switch_takes_over_clashing_flags() {
        let mut set = sample();
        set.on(Arg::new("verbose")
            .short('a')
            .long("verbose")
            .action(ArgAction::SetTrue))
            .on(Arg::new("parm-again")
                .short('p')
                .long("parm-value")
                .action(ArgAction::SetTrue));
        assert_eq!(set.arg_count(), 3);

        let parsed = set.parse("tool", &tokens(&["-a", "-p"])).unwrap();
        assert!(parsed.matches.get_flag("verbose"));
        assert!(parsed.matches.get_flag("parm-again"));
        assert!(!parsed.matches.get_flag("all"));

        let parsed = set.parse("tool", &tokens(&["--all"])).unwrap();
        assert!(parsed.matches.get_flag("all"));
    }

    #[test]
    fn help_renders_banner_then_sections() {
        let mut set = sample();
        set.on_tail(Arg::new("last").long("last").action(ArgAction::SetTrue))
            .on_head(Arg::new("first").long("first").action(ArgAction::SetTrue));
        let help = set.help();
        let lines: Vec<_> = help.lines().collect();
        assert_eq!(lines[0], "Usage: tool [options]");
        assert!(lines[1].contains("--first"));
        assert!(lines[2].contains("--parm-value INTEGER"));
        assert!(lines[3].contains("-a, --all"));
        assert!(lines[4].contains("--last"));
        assert_eq!(set.arg_count(), 4);
    }
}
