//! Severity levels for annotations.

use core::{fmt, str::FromStr};

/// Severity of a single annotation, and the aggregate severity of an errata.
///
/// Severities are totally ordered: `Diag < Info < Warn < Error`. An errata is
/// considered a failure once any of its annotations reaches
/// [`Severity::FAILURE`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(u8)]
pub enum Severity {
    /// Diagnostic, mostly of internal interest.
    #[default]
    Diag,
    /// User visible but not a problem.
    Info,
    /// Warning.
    Warn,
    /// Error.
    Error,
}

impl Severity {
    /// Severity used for notes that do not specify one.
    pub const DEFAULT: Severity = Severity::Diag;

    /// Severity at which an errata stops being ok.
    pub const FAILURE: Severity = Severity::Warn;

    /// All severities, from least to most severe.
    pub const ALL: [Severity; 4] = [
        Severity::Diag,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Returns `true` if this severity is at or above [`Severity::FAILURE`].
    #[inline]
    pub const fn is_failure(self) -> bool {
        self as u8 >= Self::FAILURE as u8
    }

    /// The lowercase name used by [`Display`](fmt::Display) and
    /// [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Diag => "diag",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing a [`Severity`] from an unknown name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseSeverityError;

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity, expected one of diag, info, warn, error")
    }
}

impl core::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Severity::ALL
            .into_iter()
            .find(|severity| s.eq_ignore_ascii_case(severity.as_str()))
            .or_else(|| s.eq_ignore_ascii_case("warning").then_some(Severity::Warn))
            .ok_or(ParseSeverityError)
    }
}
