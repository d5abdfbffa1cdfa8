use core::fmt;

use errata_internals::{ErrataData, Severity};

use crate::{
    AnnotationRef, ErrataIter,
    formatting::{DisplayWith, ErrataFormatter},
};

/// A read-only view of an [`Errata`](crate::Errata).
///
/// [`ErrataRef`] is `Copy` and borrows the errata it was created from. It is
/// what [sinks](crate::sinks) receive when an errata is abandoned, and what
/// [`Errata::as_ref`](crate::Errata::as_ref) returns.
///
/// # Examples
///
/// ```
/// use errata::{Errata, ErrataRef, Severity};
///
/// fn summarize(errata: ErrataRef<'_>) -> String {
///     format!("{} note(s), worst is {}", errata.count(), errata.severity())
/// }
///
/// let mut errata = Errata::new();
/// errata.info("starting").error("failed");
/// assert_eq!(summarize(errata.as_ref()), "2 note(s), worst is error");
/// # errata.dismiss();
/// ```
#[derive(Clone, Copy)]
pub struct ErrataRef<'a> {
    /// The shared storage, or `None` for an empty errata.
    data: Option<&'a ErrataData>,
}

impl<'a> ErrataRef<'a> {
    /// Creates a view of `data`.
    #[inline]
    pub(crate) fn new(data: Option<&'a ErrataData>) -> Self {
        Self { data }
    }

    /// The view of an empty errata.
    #[inline]
    pub(crate) const fn empty() -> Self {
        Self { data: None }
    }

    /// The highest severity of all notes, or [`Severity::DEFAULT`] if there
    /// are none.
    #[inline]
    pub fn severity(self) -> Severity {
        self.data.map_or(Severity::DEFAULT, ErrataData::severity)
    }

    /// Returns `true` if the severity is below [`Severity::FAILURE`].
    #[inline]
    pub fn is_ok(self) -> bool {
        !self.severity().is_failure()
    }

    /// Returns `true` if the severity is at least [`Severity::FAILURE`].
    #[inline]
    pub fn is_err(self) -> bool {
        self.severity().is_failure()
    }

    /// Number of notes.
    #[inline]
    pub fn count(self) -> usize {
        self.data.map_or(0, ErrataData::len)
    }

    /// Number of notes. Same as [`count`](Self::count).
    #[inline]
    pub fn len(self) -> usize {
        self.count()
    }

    /// Returns `true` if there are no notes.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.count() == 0
    }

    /// The nesting level given to new notes.
    #[inline]
    pub fn level(self) -> u32 {
        self.data.map_or(0, ErrataData::level)
    }

    /// Iterates over the notes from newest to oldest.
    #[inline]
    pub fn iter(self) -> ErrataIter<'a> {
        ErrataIter::new(self.data.map(ErrataData::iter))
    }

    /// The newest note, if any.
    #[inline]
    pub fn top(self) -> Option<AnnotationRef<'a>> {
        self.data?.front().map(AnnotationRef::from_raw)
    }

    /// The newest note.
    ///
    /// # Panics
    ///
    /// Panics if there are no notes. Use [`top`](Self::top) for a
    /// non-panicking version.
    #[track_caller]
    pub fn front(self) -> AnnotationRef<'a> {
        match self.top() {
            Some(note) => note,
            None => panic!("called `front()` on an errata without notes"),
        }
    }

    /// Renders the notes with a custom [`ErrataFormatter`].
    #[inline]
    pub fn display_with(self, formatter: &'a ErrataFormatter) -> DisplayWith<'a> {
        DisplayWith::new(self, formatter)
    }
}

impl<'a> IntoIterator for ErrataRef<'a> {
    type Item = AnnotationRef<'a>;
    type IntoIter = ErrataIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ErrataRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ErrataFormatter::DEFAULT.format(*self, f)
    }
}

impl fmt::Debug for ErrataRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Errata")
            .field("severity", &self.severity())
            .field("notes", &self.iter())
            .finish()
    }
}
