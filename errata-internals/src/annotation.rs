//! Annotation records and the chain that orders them.

use alloc::vec::Vec;
use core::iter::{FusedIterator, Rev};

use crate::{arena::ArenaSpan, severity::Severity};

/// One message: a severity, a nesting level and a text region.
///
/// The text lives in the [`MessageArena`](crate::arena::MessageArena) of the
/// errata that owns the chain; the annotation itself owns no memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Annotation {
    /// Severity of the message.
    severity: Severity,
    /// Nesting level, used for indentation when rendering.
    level: u32,
    /// Location of the message text in the owning arena.
    text: ArenaSpan,
}

impl Annotation {
    /// Creates an annotation.
    pub fn new(severity: Severity, level: u32, text: ArenaSpan) -> Self {
        Self {
            severity,
            level,
            text,
        }
    }

    /// The severity of the message.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The nesting level of the message.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Where the text of the message is stored.
    #[inline]
    pub fn text_span(&self) -> ArenaSpan {
        self.text
    }
}

/// An ordered sequence of annotations, newest first.
///
/// New annotations are pushed at the front, which is the top of the logical
/// stack. Only head insertion, full iteration and clearing are supported.
#[derive(Clone, Debug, Default)]
pub struct AnnotationChain {
    /// Annotations in insertion order; the last element is the newest.
    items: Vec<Annotation>,
}

impl AnnotationChain {
    /// Creates an empty chain without allocating.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Pushes `annotation` onto the top of the chain.
    #[inline]
    pub fn push_front(&mut self, annotation: Annotation) {
        self.items.push(annotation);
    }

    /// The newest annotation, if any.
    #[inline]
    pub fn front(&self) -> Option<&Annotation> {
        self.items.last()
    }

    /// Number of annotations.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the chain holds no annotations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every annotation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Adds `by` to the level of every annotation.
    pub fn nest(&mut self, by: u32) {
        for item in &mut self.items {
            item.level = item.level.saturating_add(by);
        }
    }

    /// Iterates from the newest annotation to the oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.items.iter().rev(),
        }
    }
}

impl<'a> IntoIterator for &'a AnnotationChain {
    type Item = &'a Annotation;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Newest-first iterator over an [`AnnotationChain`].
#[derive(Clone, Debug)]
#[must_use]
pub struct Iter<'a> {
    /// Reversed slice iterator over the insertion-ordered storage.
    inner: Rev<core::slice::Iter<'a, Annotation>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Annotation;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
