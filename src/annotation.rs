use core::fmt;

use errata_internals::{RawAnnotation, Severity};

/// A read-only view of one message in an [`Errata`](crate::Errata).
///
/// The view borrows the errata it came from, so the text can never outlive
/// the storage holding it.
///
/// # Examples
///
/// ```
/// use errata::{Errata, Severity};
///
/// let mut errata = Errata::new();
/// errata.note(Severity::Warn, "disk almost full");
///
/// let top = errata.front();
/// assert_eq!(top.severity(), Severity::Warn);
/// assert_eq!(top.text(), "disk almost full");
/// assert_eq!(top.level(), 0);
/// # errata.dismiss();
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AnnotationRef<'a> {
    /// The resolved annotation.
    raw: RawAnnotation<'a>,
}

impl<'a> AnnotationRef<'a> {
    /// Wraps a resolved annotation.
    #[inline]
    pub(crate) fn from_raw(raw: RawAnnotation<'a>) -> Self {
        Self { raw }
    }

    /// The severity of the message.
    #[inline]
    pub fn severity(self) -> Severity {
        self.raw.severity
    }

    /// The nesting level of the message.
    ///
    /// Messages merged in from another errata are one level deeper than the
    /// messages around them.
    #[inline]
    pub fn level(self) -> u32 {
        self.raw.level
    }

    /// The message text.
    #[inline]
    pub fn text(self) -> &'a str {
        self.raw.text
    }
}

impl fmt::Display for AnnotationRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.text)
    }
}

impl fmt::Debug for AnnotationRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotation")
            .field("severity", &self.raw.severity)
            .field("level", &self.raw.level)
            .field("text", &self.raw.text)
            .finish()
    }
}
