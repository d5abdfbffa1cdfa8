use core::fmt;

use errata_internals::{ErrataData, Severity};
use triomphe::Arc;

use crate::{
    AnnotationRef, ErrataIter, ErrataRef,
    formatting::{DisplayWith, ErrataFormatter},
    sinks,
};

/// The state shared by every handle to one errata.
///
/// Dropping it is what makes an errata abandoned: the last handle going away
/// drops the `Arc`, and a `Shared` that still holds notes hands them to the
/// sinks before its memory is released.
#[derive(Default)]
struct Shared {
    /// The notes and their storage.
    data: ErrataData,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if !self.data.is_empty() {
            sinks::abandon(&mut self.data);
        }
    }
}

/// A stack of severity-tagged diagnostic messages.
///
/// An [`Errata`] is a single nullable pointer. An empty errata owns nothing
/// and allocates nothing; the shared state is created by the first note.
///
/// # Sharing
///
/// Cloning an errata increments a reference count; all clones see the same
/// notes. Moving an errata is a plain move and never touches the count.
/// Mutating methods require the handle to be the only one and panic
/// otherwise, so a note added through one handle can never surprise the
/// holder of another.
///
/// # Abandonment
///
/// When the last handle to an errata that still holds notes is dropped, the
/// errata is handed to the registered [sinks](crate::sinks), once. To mark an
/// errata as handled, consume it with [`dismiss`](Self::dismiss), empty it
/// with [`clear`](Self::clear), or move its notes elsewhere with
/// [`note_take`](Self::note_take).
///
/// # Examples
///
/// ```
/// use errata::{Errata, Severity};
///
/// fn open(path: &str) -> Errata {
///     let mut errata = Errata::new();
///     errata.note_fmt(Severity::Error, format_args!("cannot open {path:?}"));
///     errata
/// }
///
/// let mut errata = open("missing.toml");
/// errata.info("while reading the configuration");
///
/// assert!(errata.is_err());
/// assert_eq!(errata.count(), 2);
/// assert_eq!(errata.front().text(), "while reading the configuration");
/// errata.dismiss();
/// ```
#[derive(Clone, Default)]
#[must_use = "dropping a non-empty errata hands it to the sinks; use `dismiss` if it was handled"]
pub struct Errata {
    /// The shared state, created on the first note.
    shared: Option<Arc<Shared>>,
}

impl Errata {
    /// Creates an empty errata without allocating.
    pub const fn new() -> Self {
        Self { shared: None }
    }

    /// Adds `text` as a new note on top of the stack.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn note(&mut self, severity: Severity, text: &str) -> &mut Self {
        self.data_mut().note_str(severity, text);
        self
    }

    /// Formats `message` into a new note on top of the stack.
    ///
    /// The message is rendered directly into the errata's own storage; it is
    /// only ever rendered a second time if it did not fit in the space left.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn note_fmt(&mut self, severity: Severity, message: impl fmt::Display) -> &mut Self {
        self.data_mut().note_display(severity, &message);
        self
    }

    /// Adds a [`Diag`](Severity::Diag) note.
    #[track_caller]
    pub fn diag(&mut self, message: impl fmt::Display) -> &mut Self {
        self.note_fmt(Severity::Diag, message)
    }

    /// Adds an [`Info`](Severity::Info) note.
    #[track_caller]
    pub fn info(&mut self, message: impl fmt::Display) -> &mut Self {
        self.note_fmt(Severity::Info, message)
    }

    /// Adds a [`Warn`](Severity::Warn) note.
    #[track_caller]
    pub fn warn(&mut self, message: impl fmt::Display) -> &mut Self {
        self.note_fmt(Severity::Warn, message)
    }

    /// Adds an [`Error`](Severity::Error) note.
    #[track_caller]
    pub fn error(&mut self, message: impl fmt::Display) -> &mut Self {
        self.note_fmt(Severity::Error, message)
    }

    /// Adds a note and returns the errata, for building one in an expression.
    ///
    /// ```
    /// use errata::{Errata, Severity};
    ///
    /// let errata = Errata::new()
    ///     .with_diag("probing")
    ///     .with_note(Severity::Error, "probe failed");
    /// assert_eq!(errata.count(), 2);
    /// # errata.dismiss();
    /// ```
    #[track_caller]
    pub fn with_note(mut self, severity: Severity, message: impl fmt::Display) -> Self {
        self.note_fmt(severity, message);
        self
    }

    /// By-value [`diag`](Self::diag).
    #[track_caller]
    pub fn with_diag(self, message: impl fmt::Display) -> Self {
        self.with_note(Severity::Diag, message)
    }

    /// By-value [`info`](Self::info).
    #[track_caller]
    pub fn with_info(self, message: impl fmt::Display) -> Self {
        self.with_note(Severity::Info, message)
    }

    /// By-value [`warn`](Self::warn).
    #[track_caller]
    pub fn with_warn(self, message: impl fmt::Display) -> Self {
        self.with_note(Severity::Warn, message)
    }

    /// By-value [`error`](Self::error).
    #[track_caller]
    pub fn with_error(self, message: impl fmt::Display) -> Self {
        self.with_note(Severity::Error, message)
    }

    /// Notes `error` and each of its [sources](core::error::Error::source).
    ///
    /// The innermost source is noted first, so `error` itself ends up on top.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn note_error(&mut self, severity: Severity, error: &dyn core::error::Error) -> &mut Self {
        if let Some(source) = error.source() {
            self.note_error(severity, source);
        }
        self.note_fmt(severity, error)
    }

    /// Copies the notes of `other` on top of this errata.
    ///
    /// `other` is left untouched. The copied notes keep their order and are
    /// nested one level below this errata's current level.
    ///
    /// # Panics
    ///
    /// Panics if this errata is shared with another handle.
    #[track_caller]
    pub fn note_from(&mut self, other: &Errata) -> &mut Self {
        if let Some(source) = &other.shared {
            if !source.data.is_empty() {
                self.data_mut().absorb(&source.data);
            }
        }
        self
    }

    /// Moves the notes of `other` on top of this errata.
    ///
    /// Afterwards `other` counts as handled and is not dispatched to the sinks
    /// through this call. If `other` was shared, only its handle is released;
    /// the remaining handles keep their notes.
    ///
    /// The moved notes are nested exactly as with [`note_from`](Self::note_from).
    /// When this errata has no notes and `other` is its only handle, the
    /// state is taken over and re-based instead of copied.
    ///
    /// # Panics
    ///
    /// Panics if this errata is shared with another handle.
    #[track_caller]
    pub fn note_take(&mut self, mut other: Errata) -> &mut Self {
        if self.is_empty() && self.is_unique() {
            if let Some(mut taken) = other.shared.take() {
                if let Some(shared) = Arc::get_mut(&mut taken) {
                    shared.data.nest_under(self.level());
                    self.shared = Some(taken);
                    return self;
                }
                other.shared = Some(taken);
            }
        }
        self.note_from(&other);
        other.dismiss();
        self
    }

    /// Removes every note and resets the severity and level.
    ///
    /// A cleared errata is not dispatched to the sinks. The storage is kept
    /// for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn clear(&mut self) {
        if self.shared.is_some() {
            self.data_mut().clear();
        }
    }

    /// Consumes the errata, marking its notes as handled.
    ///
    /// If this is the only handle, the notes are discarded without reaching
    /// the sinks. Otherwise only this handle is released.
    pub fn dismiss(mut self) {
        if let Some(shared) = self.shared.as_mut().and_then(Arc::get_mut) {
            shared.data.clear();
        }
    }

    /// Returns `true` if the severity is below [`Severity::FAILURE`].
    ///
    /// An empty errata is always ok.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.as_ref().is_ok()
    }

    /// Returns `true` if the severity is at least [`Severity::FAILURE`].
    #[inline]
    pub fn is_err(&self) -> bool {
        self.as_ref().is_err()
    }

    /// The highest severity of all notes, or [`Severity::DEFAULT`] if there
    /// are none.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.as_ref().severity()
    }

    /// Number of notes.
    #[inline]
    pub fn count(&self) -> usize {
        self.as_ref().count()
    }

    /// Number of notes. Same as [`count`](Self::count).
    #[inline]
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Returns `true` if there are no notes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Iterates over the notes from newest to oldest.
    pub fn iter(&self) -> ErrataIter<'_> {
        self.as_ref().iter()
    }

    /// The newest note, if any.
    pub fn top(&self) -> Option<AnnotationRef<'_>> {
        self.as_ref().top()
    }

    /// The newest note.
    ///
    /// # Panics
    ///
    /// Panics if there are no notes. Use [`top`](Self::top) for a
    /// non-panicking version.
    #[track_caller]
    pub fn front(&self) -> AnnotationRef<'_> {
        self.as_ref().front()
    }

    /// The nesting level given to new notes.
    #[inline]
    pub fn level(&self) -> u32 {
        self.as_ref().level()
    }

    /// Sets the nesting level given to new notes.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn set_level(&mut self, level: u32) -> &mut Self {
        if self.shared.is_some() || level != 0 {
            self.data_mut().set_level(level);
        }
        self
    }

    /// Number of handles sharing this errata's state, or `0` if the errata
    /// is empty and has never allocated.
    pub fn strong_count(&self) -> usize {
        self.shared.as_ref().map_or(0, Arc::count)
    }

    /// Returns `true` if no other handle shares this errata's state.
    pub fn is_unique(&self) -> bool {
        self.shared.as_ref().is_none_or(Arc::is_unique)
    }

    /// A read-only view of the errata.
    pub fn as_ref(&self) -> ErrataRef<'_> {
        match &self.shared {
            Some(shared) => ErrataRef::new(Some(&shared.data)),
            None => ErrataRef::empty(),
        }
    }

    /// Converts into `Ok(self)` if the errata [is ok](Self::is_ok) and
    /// `Err(self)` otherwise.
    ///
    /// ```
    /// use errata::Errata;
    ///
    /// fn check(errata: Errata) -> Result<Errata, Errata> {
    ///     let notes = errata.into_result()?;
    ///     Ok(notes)
    /// }
    ///
    /// assert!(check(Errata::new().with_info("fine")).is_ok());
    /// ```
    pub fn into_result(self) -> Result<Errata, Errata> {
        if self.is_ok() { Ok(self) } else { Err(self) }
    }

    /// Renders the notes with a custom [`ErrataFormatter`].
    pub fn display_with<'a>(&'a self, formatter: &'a ErrataFormatter) -> DisplayWith<'a> {
        self.as_ref().display_with(formatter)
    }

    /// Writes the notes, rendered with the default formatter, to `out`.
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn write_to<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "{self}")
    }

    /// Exclusive access to the shared state, creating it if needed.
    #[track_caller]
    fn data_mut(&mut self) -> &mut ErrataData {
        let shared = self.shared.get_or_insert_with(|| Arc::new(Shared::default()));
        match Arc::get_mut(shared) {
            Some(shared) => &mut shared.data,
            None => shared_mutation(),
        }
    }
}

#[cold]
#[track_caller]
fn shared_mutation() -> ! {
    panic!("cannot modify an errata that is shared with another handle")
}

impl<'a> IntoIterator for &'a Errata {
    type Item = AnnotationRef<'a>;
    type IntoIter = ErrataIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Errata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_ref(), f)
    }
}

impl fmt::Debug for Errata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_ref(), f)
    }
}
