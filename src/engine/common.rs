//! engine::common
//!
//! Options available at toplevel and per-command scope.

use clap::{Arg, ArgAction, ArgMatches};

use super::Context;
use crate::options::{HelpEntry, OptionSet, Placement};

const DEBUG: &str = "toplevel-debug";
const NO_DEBUG: &str = "toplevel-no-debug";
const VERBOSE: &str = "toplevel-verbose";
const NO_VERBOSE: &str = "toplevel-no-verbose";
const HELP: &str = "toplevel-help";
const VERSION: &str = "toplevel-version";

/// What the common options ask the dispatcher to do besides updating the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Request {
    Help,
    Version,
}

/// Common option values extracted from one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CommonFlags {
    pub debug: Option<bool>,
    pub verbose: Option<bool>,
    pub request: Option<Request>,
}

impl CommonFlags {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let requested = |id: &str| {
            matches
                .get_flag(id)
                .then(|| matches.index_of(id).unwrap_or_default())
        };
        let request = match (requested(HELP), requested(VERSION)) {
            (Some(help), Some(version)) if version < help => Some(Request::Version),
            (Some(_), _) => Some(Request::Help),
            (None, Some(_)) => Some(Request::Version),
            (None, None) => None,
        };

        Self {
            debug: toggled(matches, DEBUG, NO_DEBUG),
            verbose: toggled(matches, VERBOSE, NO_VERBOSE),
            request,
        }
    }

    /// Copy the toggles that were given onto `ctx`.
    pub fn apply(&self, ctx: &mut Context) {
        if let Some(debug) = self.debug {
            ctx.debug = debug;
        }
        if let Some(verbose) = self.verbose {
            ctx.verbose = verbose;
        }
    }
}

fn toggled(matches: &ArgMatches, on: &str, off: &str) -> Option<bool> {
    if matches.get_flag(on) {
        Some(true)
    } else if matches.get_flag(off) {
        Some(false)
    } else {
        None
    }
}

/// Append the common options section to `options`.
pub(crate) fn common_options(options: &mut OptionSet) {
    options.separator("").separator("Common options:");
    options.switch(
        Placement::Body,
        HelpEntry::switch("    --[no-]debug", "Show debugging output"),
        negatable(DEBUG, NO_DEBUG, None, "debug", "no-debug"),
    );
    options.switch(
        Placement::Body,
        HelpEntry::switch("-v, --[no-]verbose", "Show extra output"),
        negatable(VERBOSE, NO_VERBOSE, Some('v'), "verbose", "no-verbose"),
    );
    options.switch(
        Placement::Tail,
        HelpEntry::switch("-h, --help", "Show this message"),
        [flag(HELP, "help").short('h')],
    );
    options.switch(
        Placement::Body,
        HelpEntry::switch("    --version", "Show version"),
        [flag(VERSION, "version")],
    );
}

fn flag(id: &'static str, long: &'static str) -> Arg {
    Arg::new(id).long(long).action(ArgAction::SetTrue)
}

/// A `--x`/`--no-x` pair where the last occurrence wins.
fn negatable(
    on: &'static str,
    off: &'static str,
    short: Option<char>,
    long: &'static str,
    no_long: &'static str,
) -> [Arg; 2] {
    let mut positive = flag(on, long).overrides_with(off);
    if let Some(short) = short {
        positive = positive.short(short);
    }
    [positive, flag(off, no_long).overrides_with(on)]
}
