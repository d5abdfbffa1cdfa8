use core::fmt;

use crate::{Errata, Severity};

/// A value paired with the diagnostics produced while computing it.
///
/// Use [`Rv<T>`] for functions that always produce a value but may have
/// something to say about it, or that need to report a failure through the
/// errata while still handing back a placeholder value.
///
/// The value and the errata are independent: neither is checked when the
/// other is accessed. There is no implicit conversion to `T`; taking the value
/// while dropping the errata is spelled out with
/// [`into_value_discarding_errata`](Self::into_value_discarding_errata).
///
/// # Examples
///
/// ```
/// use errata::{Errata, Rv, Severity};
///
/// fn count_lines(text: &str) -> Rv<usize> {
///     let mut rv = Rv::new(text.lines().count());
///     if text.is_empty() {
///         rv.note(Severity::Info, "input was empty");
///     }
///     rv
/// }
///
/// let (lines, errata) = count_lines("").into_parts();
/// assert_eq!(lines, 0);
/// assert!(errata.is_ok());
/// assert_eq!(errata.count(), 1);
/// # errata.dismiss();
/// ```
#[derive(Clone, Default)]
#[must_use = "an `Rv` carries diagnostics that are dispatched to the sinks when dropped"]
pub struct Rv<T> {
    /// The result value.
    value: T,
    /// The diagnostics.
    errata: Errata,
}

impl<T> Rv<T> {
    /// Wraps `value` with an empty errata.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            errata: Errata::new(),
        }
    }

    /// Pairs `value` with `errata`.
    pub const fn from_parts(value: T, errata: Errata) -> Self {
        Self { value, errata }
    }

    /// Pairs the default value with `errata`.
    ///
    /// This is the usual way to return a failure from a function returning
    /// [`Rv<T>`].
    pub fn from_errata(errata: Errata) -> Self
    where
        T: Default,
    {
        Self::from_parts(T::default(), errata)
    }

    /// The value.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The value, mutably.
    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// The errata.
    #[inline]
    pub fn errata(&self) -> &Errata {
        &self.errata
    }

    /// The errata, mutably.
    #[inline]
    pub fn errata_mut(&mut self) -> &mut Errata {
        &mut self.errata
    }

    /// Takes the value and drops the errata.
    ///
    /// A non-empty errata dropped this way is abandoned and reaches the
    /// sinks, unless other handles to it are still alive.
    #[inline]
    pub fn into_value_discarding_errata(self) -> T {
        self.value
    }

    /// Takes the errata and drops the value.
    #[inline]
    pub fn into_errata(self) -> Errata {
        self.errata
    }

    /// Splits into the value and the errata.
    ///
    /// ```
    /// use errata::{Errata, Rv};
    ///
    /// let rv: Rv<i32> = Errata::new().with_error("no value").into();
    /// let (value, errata) = rv.into_parts();
    /// assert_eq!(value, 0);
    /// assert!(!errata.is_ok());
    /// # errata.dismiss();
    /// ```
    #[inline]
    pub fn into_parts(self) -> (T, Errata) {
        (self.value, self.errata)
    }

    /// Borrows the value and the errata.
    #[inline]
    pub fn as_parts(&self) -> (&T, &Errata) {
        (&self.value, &self.errata)
    }

    /// Replaces the value, keeping the errata, and returns the new value.
    pub fn set_value(&mut self, value: T) -> &mut T {
        self.value = value;
        &mut self.value
    }

    /// Replaces the value, keeping the errata.
    pub fn assign(&mut self, value: T) -> &mut Self {
        self.value = value;
        self
    }

    /// Replaces the errata, returning the previous one.
    pub fn set_errata(&mut self, errata: Errata) -> Errata {
        core::mem::replace(&mut self.errata, errata)
    }

    /// Adds a note to the errata.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn note(&mut self, severity: Severity, text: &str) -> &mut Self {
        self.errata.note(severity, text);
        self
    }

    /// Adds a formatted note to the errata.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn note_fmt(&mut self, severity: Severity, message: impl fmt::Display) -> &mut Self {
        self.errata.note_fmt(severity, message);
        self
    }

    /// Returns `true` if the errata [is ok](Errata::is_ok).
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.errata.is_ok()
    }

    /// Clears the errata, keeping the value.
    ///
    /// # Panics
    ///
    /// Panics if the errata is shared with another handle.
    #[track_caller]
    pub fn clear(&mut self) -> &mut Self {
        self.errata.clear();
        self
    }

    /// Transforms the value, keeping the errata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Rv<U> {
        Rv {
            value: f(self.value),
            errata: self.errata,
        }
    }
}

/// Pairs `value` with `errata`. Same as [`Rv::from_parts`].
pub const fn make_rv<T>(value: T, errata: Errata) -> Rv<T> {
    Rv::from_parts(value, errata)
}

impl<T: Default> From<Errata> for Rv<T> {
    fn from(errata: Errata) -> Self {
        Self::from_errata(errata)
    }
}

impl<T> From<Rv<T>> for (T, Errata) {
    fn from(rv: Rv<T>) -> Self {
        rv.into_parts()
    }
}

impl<T: fmt::Debug> fmt::Debug for Rv<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rv")
            .field("value", &self.value)
            .field("errata", &self.errata)
            .finish()
    }
}
