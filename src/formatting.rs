//! Textual rendering of errata.
//!
//! The [`Display`](core::fmt::Display) implementations of
//! [`Errata`](crate::Errata) and [`ErrataRef`] use
//! [`ErrataFormatter::DEFAULT`]: one note per line, newest first, indented by
//! nesting level and prefixed with the severity:
//!
//! ```text
//! [error] failed to open "config.toml"
//!   [warn] falling back to defaults
//! [info] while loading settings
//! ```
//!
//! A custom [`ErrataFormatter`] is built with its builder methods and applied
//! with [`Errata::display_with`](crate::Errata::display_with):
//!
//! ```
//! use errata::{Errata, formatting::ErrataFormatter};
//!
//! let mut errata = Errata::new();
//! errata.info("inner").warn("outer");
//!
//! let compact = ErrataFormatter::new().glue("; ").show_severity(false);
//! assert_eq!(errata.display_with(&compact).to_string(), "outer; inner");
//! # errata.dismiss();
//! ```

use core::fmt;

use crate::ErrataRef;

/// Controls how the notes of an errata are rendered as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrataFormatter {
    /// Written between consecutive notes.
    glue: &'static str,
    /// Written once per nesting level before a note.
    indent: &'static str,
    /// Whether each note is prefixed with `[severity] `.
    show_severity: bool,
}

impl ErrataFormatter {
    /// The formatter used by the `Display` implementations: newline glue, two
    /// spaces of indentation per level, severity tags shown.
    pub const DEFAULT: Self = Self {
        glue: "\n",
        indent: "  ",
        show_severity: true,
    };

    /// Creates a formatter with the [default](Self::DEFAULT) settings.
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the separator written between notes.
    #[must_use]
    pub const fn glue(mut self, glue: &'static str) -> Self {
        self.glue = glue;
        self
    }

    /// Sets the string written once per nesting level before a note.
    #[must_use]
    pub const fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Sets whether notes are prefixed with their severity.
    #[must_use]
    pub const fn show_severity(mut self, show: bool) -> Self {
        self.show_severity = show;
        self
    }

    /// Writes the notes of `errata` to `f`, newest first.
    pub fn format(&self, errata: ErrataRef<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, note) in errata.iter().enumerate() {
            if i > 0 {
                f.write_str(self.glue)?;
            }
            for _ in 0..note.level() {
                f.write_str(self.indent)?;
            }
            if self.show_severity {
                write!(f, "[{}] ", note.severity())?;
            }
            f.write_str(note.text())?;
        }
        Ok(())
    }
}

impl Default for ErrataFormatter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Renders an errata with a specific [`ErrataFormatter`].
///
/// Returned by [`Errata::display_with`](crate::Errata::display_with) and
/// [`ErrataRef::display_with`].
#[derive(Clone, Copy)]
#[must_use]
pub struct DisplayWith<'a> {
    /// The errata to render.
    errata: ErrataRef<'a>,
    /// The settings to render with.
    formatter: &'a ErrataFormatter,
}

impl<'a> DisplayWith<'a> {
    /// Pairs an errata with a formatter.
    pub(crate) fn new(errata: ErrataRef<'a>, formatter: &'a ErrataFormatter) -> Self {
        Self { errata, formatter }
    }
}

impl fmt::Display for DisplayWith<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.formatter.format(self.errata, f)
    }
}

impl fmt::Debug for DisplayWith<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
