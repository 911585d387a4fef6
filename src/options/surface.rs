//! options::surface
//!
//! Deferred option registration for commands.
//!
//! # Design
//!
//! A command never sees the real parser. It fills an [`OptionSurface`]
//! instead; the dispatcher inspects the buffer (does it define any option?)
//! to decide on a section header, then replays it onto the [`OptionSet`].
//! Only four verbs exist: `on`, `on_head`, `on_tail` and `separator`.

use clap::Arg;

use super::OptionSet;

/// A buffered registration.
#[derive(Debug, Clone)]
pub enum SurfaceOp {
    /// Switch appended to the body.
    On(Arg),
    /// Switch placed directly after the banner.
    OnHead(Arg),
    /// Switch placed at the end of the help screen.
    OnTail(Arg),
    /// Free-form help line.
    Separator(String),
}

impl SurfaceOp {
    /// True for the `on*` verbs.
    pub fn is_option(&self) -> bool {
        !matches!(self, SurfaceOp::Separator(_))
    }
}

/// Buffer of option registrations made by a command.
///
/// # Example
///
/// ```
/// use clap::{value_parser, Arg};
/// use toplevel::options::OptionSurface;
///
/// let mut opts = OptionSurface::new();
/// opts.separator("Tuning:");
/// assert!(!opts.defines_options());
///
/// opts.on(
///     Arg::new("increment")
///         .short('i')
///         .long("increment")
///         .value_name("INTEGER")
///         .value_parser(value_parser!(i64))
///         .help("Set increment amount"),
/// );
/// assert!(opts.defines_options());
/// assert_eq!(opts.ops().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionSurface {
    ops: Vec<SurfaceOp>,
}

impl OptionSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, arg: Arg) -> &mut Self {
        self.ops.push(SurfaceOp::On(arg));
        self
    }

    pub fn on_head(&mut self, arg: Arg) -> &mut Self {
        self.ops.push(SurfaceOp::OnHead(arg));
        self
    }

    pub fn on_tail(&mut self, arg: Arg) -> &mut Self {
        self.ops.push(SurfaceOp::OnTail(arg));
        self
    }

    pub fn separator(&mut self, text: impl Into<String>) -> &mut Self {
        self.ops.push(SurfaceOp::Separator(text.into()));
        self
    }

    /// Whether any `on`, `on_head` or `on_tail` call was made.
    pub fn defines_options(&self) -> bool {
        self.ops.iter().any(SurfaceOp::is_option)
    }

    /// Buffered operations in call order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every buffered operation to `target`, in call order.
    pub fn replay(self, target: &mut OptionSet) {
        for op in self.ops {
            match op {
                SurfaceOp::On(arg) => target.on(arg),
                SurfaceOp::OnHead(arg) => target.on_head(arg),
                SurfaceOp::OnTail(arg) => target.on_tail(arg),
                SurfaceOp::Separator(text) => target.separator(text),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ArgAction;

    fn flag(id: &'static str, long: &'static str) -> Arg {
        Arg::new(id).long(long).action(ArgAction::SetTrue)
    }

    #[test]
    fn empty_surface_defines_nothing() {
        let opts = OptionSurface::new();
        assert!(opts.is_empty());
        assert!(!opts.defines_options());
    }

    #[test]
    fn separators_alone_do_not_count_as_options() {
        let mut opts = OptionSurface::new();
        opts.separator("").separator("Notes:");
        assert!(!opts.is_empty());
        assert!(!opts.defines_options());
    }

    #[test]
    fn every_on_verb_counts() {
        let mut head = OptionSurface::new();
        head.on_head(flag("a", "alpha"));
        assert!(head.defines_options());

        let mut tail = OptionSurface::new();
        tail.on_tail(flag("b", "beta"));
        assert!(tail.defines_options());
    }

    #[test]
    fn replay_places_ops_by_verb() {
        let mut opts = OptionSurface::new();
        opts.on(flag("body", "body"))
            .on_tail(flag("tail", "tail"))
            .separator("middle")
            .on_head(flag("head", "head"));

        let mut set = OptionSet::new("Usage: test");
        opts.replay(&mut set);

        let help = set.help();
        let position = |needle: &str| help.find(needle).unwrap();
        assert!(position("--head") < position("--body"));
        assert!(position("--body") < position("middle"));
        assert!(position("middle") < position("--tail"));
    }
}
