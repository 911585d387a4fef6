//! options::help
//!
//! Help entries and their rendering.
//!
//! # Layout
//!
//! A help screen is a banner followed by the head, body and tail sections of
//! an [`OptionSet`](super::OptionSet). Entries render in registration order:
//!
//! ```text
//! Usage: tool [global-options] debug [options] FILES
//!
//! Debug command options:
//!     -p, --parm-value INTEGER         Set the parm value
//!
//! Common options:
//!         --[no-]debug                 Show debugging output
//!     -v, --[no-]verbose               Show extra output
//!         --version                    Show version
//!     -h, --help                       Show this message
//! ```

use clap::Arg;

/// Indent applied to switch and command summary lines.
pub const SUMMARY_INDENT: &str = "    ";

/// Width of the flags column before the description starts.
pub const SUMMARY_WIDTH: usize = 32;

/// One line (or line pair) of a help screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpEntry {
    /// Free-form text, rendered verbatim.
    Separator(String),
    /// A switch summary: flags column followed by the description.
    Switch {
        /// Rendered flags, e.g. `-v, --[no-]verbose`.
        flags: String,
        /// One-line description.
        help: String,
    },
}

impl HelpEntry {
    /// Create a free-form line.
    pub fn separator(text: impl Into<String>) -> Self {
        HelpEntry::Separator(text.into())
    }

    /// Create a switch summary from pre-rendered flags.
    pub fn switch(flags: impl Into<String>, help: impl Into<String>) -> Self {
        HelpEntry::Switch {
            flags: flags.into(),
            help: help.into(),
        }
    }

    /// Summarize a clap argument.
    ///
    /// # Example
    ///
    /// ```
    /// use clap::Arg;
    /// use toplevel::options::HelpEntry;
    ///
    /// let arg = Arg::new("parm")
    ///     .short('p')
    ///     .long("parm-value")
    ///     .value_name("INTEGER")
    ///     .help("Set the parm value");
    ///
    /// assert_eq!(
    ///     HelpEntry::for_arg(&arg),
    ///     HelpEntry::switch("-p, --parm-value INTEGER", "Set the parm value")
    /// );
    /// ```
    pub fn for_arg(arg: &Arg) -> Self {
        HelpEntry::Switch {
            flags: flags_for(arg),
            help: arg.get_help().map(ToString::to_string).unwrap_or_default(),
        }
    }

    /// Append this entry to `out`, newline terminated.
    pub fn render_into(&self, out: &mut String) {
        match self {
            HelpEntry::Separator(text) => {
                out.push_str(text);
                out.push('\n');
            }
            HelpEntry::Switch { flags, help } => {
                if flags.len() > SUMMARY_WIDTH {
                    out.push_str(SUMMARY_INDENT);
                    out.push_str(flags);
                    out.push('\n');
                    if !help.is_empty() {
                        out.push_str(&summary_line("", help));
                        out.push('\n');
                    }
                } else {
                    out.push_str(&summary_line(flags, help));
                    out.push('\n');
                }
            }
        }
    }
}

/// Format an indented, left-justified summary line.
///
/// Used for switches and for the entries of the `Commands:` listing.
pub fn summary_line(left: &str, right: &str) -> String {
    let line = format!(
        "{}{:<width$} {}",
        SUMMARY_INDENT,
        left,
        right,
        width = SUMMARY_WIDTH
    );
    line.trim_end().to_string()
}

/// Render the flags column for an argument, e.g. `-p, --parm-value INTEGER`.
///
/// Long-only switches are padded so their long form lines up with switches
/// that also carry a short form.
pub fn flags_for(arg: &Arg) -> String {
    let mut flags = match (arg.get_short(), arg.get_long()) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => arg.get_id().as_str().to_string(),
    };
    if let Some(hint) = value_hint(arg) {
        flags.push(' ');
        flags.push_str(&hint);
    }
    flags
}

fn value_hint(arg: &Arg) -> Option<String> {
    if !arg.get_action().takes_values() {
        return None;
    }
    match arg.get_value_names() {
        Some(names) if !names.is_empty() => Some(
            names
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => Some(arg.get_id().as_str().to_uppercase()),
    }
}
