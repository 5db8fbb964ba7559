//! Colour for the status and error lines written to stderr.

use std::fmt::Display;

use console::{Style, StyledObject, Term};

/// Colours applied to user-facing status lines.
///
/// Colour is decided once per run. It is forced on or off instead of left to
/// `console`'s own detection, because the runtime may be writing to an
/// injected buffer rather than the real stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    colour: bool,
}

impl Palette {
    pub(crate) const fn new(colour: bool) -> Self {
        Self { colour }
    }

    /// Enables colour when the process stderr is a terminal.
    pub(crate) fn for_stderr() -> Self {
        Self::new(Term::stderr().is_term())
    }

    pub(crate) const fn colour(self) -> bool {
        self.colour
    }

    pub(crate) fn success<D: Display>(self, text: D) -> StyledObject<D> {
        self.paint(Style::new().green(), text)
    }

    pub(crate) fn failure<D: Display>(self, text: D) -> StyledObject<D> {
        self.paint(Style::new().red(), text)
    }

    fn paint<D: Display>(self, style: Style, text: D) -> StyledObject<D> {
        style.force_styling(self.colour).apply_to(text)
    }
}
