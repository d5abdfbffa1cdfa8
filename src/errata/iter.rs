use core::iter::FusedIterator;

use errata_internals::data;

use crate::AnnotationRef;

/// Iterator over the notes of an errata, from newest to oldest.
///
/// Created by [`Errata::iter`](crate::Errata::iter) and
/// [`ErrataRef::iter`](crate::ErrataRef::iter). Iterating in reverse yields
/// the oldest note first.
///
/// # Examples
///
/// ```
/// use errata::{Errata, Severity};
///
/// let mut errata = Errata::new();
/// errata.info("first").warn("second");
///
/// let texts: Vec<&str> = errata.iter().map(|note| note.text()).collect();
/// assert_eq!(texts, ["second", "first"]);
///
/// let oldest = errata.iter().next_back().unwrap();
/// assert_eq!(oldest.severity(), Severity::Info);
/// # errata.dismiss();
/// ```
#[derive(Clone)]
#[must_use]
pub struct ErrataIter<'a> {
    /// Iterator over the storage, or `None` for an empty errata.
    inner: Option<data::Iter<'a>>,
}

impl<'a> ErrataIter<'a> {
    /// Creates an iterator over the given storage.
    pub(crate) fn new(inner: Option<data::Iter<'a>>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for ErrataIter<'a> {
    type Item = AnnotationRef<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(AnnotationRef::from_raw)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(inner) => inner.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl DoubleEndedIterator for ErrataIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .as_mut()?
            .next_back()
            .map(AnnotationRef::from_raw)
    }
}

impl ExactSizeIterator for ErrataIter<'_> {}

impl FusedIterator for ErrataIter<'_> {}

impl core::fmt::Debug for ErrataIter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
