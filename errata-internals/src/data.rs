//! The payload shared between all handles of one errata.
//!
//! [`ErrataData`] ties a [`MessageArena`] to the [`AnnotationChain`] whose text
//! it stores, and keeps the aggregate severity of the chain up to date. It has
//! no notion of sharing: callers hand it a `&mut` only when they have proven
//! exclusive access.
//!
//! # Two-phase text commit
//!
//! Formatted messages are first rendered straight into the arena's remnant.
//! If the text fits, exactly the bytes used are claimed in place. If it does
//! not, the failed attempt has already measured the exact size needed, so an
//! exact block is allocated and the message is rendered a second time. No
//! message is ever rendered more than twice and the extra work is only paid
//! when the remnant is too small.

use core::fmt;

use crate::{
    annotation::{self, Annotation, AnnotationChain},
    arena::{ArenaSpan, MessageArena},
    render::{self, FixedBufferWriter},
    severity::Severity,
};

/// The storage behind an errata: message text, the annotation chain, the
/// current nesting level and the aggregate severity.
///
/// The aggregate severity is always the maximum severity in the chain, or
/// [`Severity::DEFAULT`] when it is empty.
#[derive(Default)]
pub struct ErrataData {
    /// The message stack.
    chain: AnnotationChain,
    /// Annotation text storage.
    arena: MessageArena,
    /// Nesting level stamped on new annotations.
    level: u32,
    /// Maximum severity of the chain.
    severity: Severity,
}

/// A read-only view of one annotation with its text resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawAnnotation<'a> {
    /// Severity of the message.
    pub severity: Severity,
    /// Nesting level of the message.
    pub level: u32,
    /// The message text.
    pub text: &'a str,
}

impl ErrataData {
    /// Creates empty data without allocating.
    pub const fn new() -> Self {
        Self {
            chain: AnnotationChain::new(),
            arena: MessageArena::new(),
            level: 0,
            severity: Severity::DEFAULT,
        }
    }

    /// Returns `true` if there are no annotations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of annotations.
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// The maximum severity of all annotations.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The nesting level given to new annotations.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Sets the nesting level given to new annotations.
    #[inline]
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// The arena holding the annotation text.
    #[inline]
    pub fn arena(&self) -> &MessageArena {
        &self.arena
    }

    /// The annotation chain.
    #[inline]
    pub fn chain(&self) -> &AnnotationChain {
        &self.chain
    }

    /// Pushes an annotation whose text is already stored in this arena.
    ///
    /// The aggregate severity is raised to `severity` if needed. `text` must
    /// have come from this data's own arena and hold valid UTF-8.
    pub(crate) fn note_localized(&mut self, severity: Severity, level: u32, text: ArenaSpan) {
        self.chain.push_front(Annotation::new(severity, level, text));
        self.severity = self.severity.max(severity);
    }

    /// Copies `text` into the arena and pushes it as a new annotation.
    pub fn note_str(&mut self, severity: Severity, text: &str) {
        let span = self.localize(text);
        self.note_localized(severity, self.level, span);
    }

    /// Renders `message` into the arena and pushes it as a new annotation.
    ///
    /// See the [module documentation](self) for the two-phase commit.
    pub fn note_display(&mut self, severity: Severity, message: &dyn fmt::Display) {
        let span = self.commit_display(message);
        self.note_localized(severity, self.level, span);
    }

    /// Copies every annotation of `other` into this data.
    ///
    /// `other`'s newest annotation becomes the newest annotation here, so the
    /// merged chain still reads newest-first. Copied annotations are nested
    /// one level below this data's current level.
    pub fn absorb(&mut self, other: &ErrataData) {
        let base = self.level.saturating_add(1);
        for note in other.chain.iter().rev() {
            let text = other.text_of(note);
            let span = self.localize(text);
            self.note_localized(note.severity(), base.saturating_add(note.level()), span);
        }
    }

    /// Re-bases these annotations as if they had been
    /// [absorbed](Self::absorb) into empty data at `level`.
    ///
    /// Every annotation is nested one level below `level`, which becomes the
    /// level given to new annotations.
    pub fn nest_under(&mut self, level: u32) {
        self.chain.nest(level.saturating_add(1));
        self.level = level;
    }

    /// Removes every annotation, releases the arena's text and resets the
    /// severity and level.
    pub fn clear(&mut self) {
        self.chain.clear();
        self.arena.clear();
        self.level = 0;
        self.severity = Severity::DEFAULT;
    }

    /// The newest annotation, if any.
    pub fn front(&self) -> Option<RawAnnotation<'_>> {
        self.chain.front().map(|note| self.resolve(note))
    }

    /// Iterates over the annotations from newest to oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            data: self,
            inner: self.chain.iter(),
        }
    }

    /// Copies `text` into an exact-size arena block.
    fn localize(&mut self, text: &str) -> ArenaSpan {
        let span = self.arena.alloc(text.len());
        self.arena.get_mut(span).copy_from_slice(text.as_bytes());
        span
    }

    /// Renders `message` into the arena using the two-phase commit.
    fn commit_display(&mut self, message: &dyn fmt::Display) -> ArenaSpan {
        let (extent, overflowed) = render::render(self.arena.remnant(), message);
        if !overflowed {
            // Claim the part of the remnant actually used.
            return self.arena.alloc(extent);
        }

        let span = self.arena.alloc(extent);
        let mut writer = FixedBufferWriter::new(self.arena.get_mut(span));
        let _ = fmt::write(&mut writer, format_args!("{message}"));
        if writer.extent() != extent {
            // The value rendered differently the second time. Keep the valid
            // UTF-8 part of what fit.
            let valid = valid_utf8_prefix(writer.written());
            return span.prefix(valid);
        }
        span
    }

    /// Resolves an annotation's text against this arena.
    fn resolve<'a>(&'a self, note: &Annotation) -> RawAnnotation<'a> {
        RawAnnotation {
            severity: note.severity(),
            level: note.level(),
            text: self.text_of(note),
        }
    }

    /// The text of an annotation stored in this arena.
    fn text_of(&self, note: &Annotation) -> &str {
        let bytes = self.arena.get(note.text_span());
        // SAFETY: Annotation text only ever enters the arena in two ways:
        // 1. `localize`, which copies the bytes of a `&str`.
        // 2. `commit_display`, which keeps a rendering only when it was not
        //    truncated (so it consists of whole `&str` pieces written by
        //    `fmt::write`), and otherwise shortens the span to a valid UTF-8
        //    prefix.
        // Annotations are only ever resolved against the arena that stored
        // them, and the arena is cleared together with the chain.
        unsafe { core::str::from_utf8_unchecked(bytes) }
    }
}

/// Length of the longest prefix of `bytes` that is valid UTF-8.
fn valid_utf8_prefix(bytes: &[u8]) -> usize {
    match core::str::from_utf8(bytes) {
        Ok(s) => s.len(),
        Err(e) => e.valid_up_to(),
    }
}

impl fmt::Debug for ErrataData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrataData")
            .field("severity", &self.severity)
            .field("level", &self.level)
            .field("annotations", &DebugNotes(self))
            .field("arena", &self.arena)
            .finish()
    }
}

/// Debug helper listing the resolved annotations.
struct DebugNotes<'a>(&'a ErrataData);

impl fmt::Debug for DebugNotes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Newest-first iterator over the resolved annotations of an [`ErrataData`].
#[derive(Clone)]
#[must_use]
pub struct Iter<'a> {
    /// The data holding the text.
    data: &'a ErrataData,
    /// Iterator over the chain.
    inner: annotation::Iter<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = RawAnnotation<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|note| self.data.resolve(note))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|note| self.data.resolve(note))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl core::iter::FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec::Vec};

    use super::*;

    fn texts(data: &ErrataData) -> Vec<&str> {
        data.iter().map(|note| note.text).collect()
    }

    #[test]
    fn test_new_is_empty_and_unallocated() {
        let data = ErrataData::new();
        assert!(data.is_empty());
        assert_eq!(data.severity(), Severity::DEFAULT);
        assert_eq!(data.arena().chunk_count(), 0);
        assert!(data.front().is_none());
    }

    #[test]
    fn test_severity_is_running_max() {
        let mut data = ErrataData::new();
        let sequence = [
            Severity::Info,
            Severity::Diag,
            Severity::Error,
            Severity::Warn,
            Severity::Info,
        ];
        let mut expected = Severity::DEFAULT;
        for severity in sequence {
            data.note_str(severity, "x");
            expected = expected.max(severity);
            assert_eq!(data.severity(), expected);
        }
    }

    #[test]
    fn test_remnant_path_uses_one_chunk() {
        let mut data = ErrataData::new();
        data.note_display(Severity::Info, &format_args!("value = {}", 17));
        data.note_display(Severity::Warn, &format_args!("{}-{}", "a", 'b'));

        assert_eq!(texts(&data), ["a-b", "value = 17"]);
        assert_eq!(data.arena().chunk_count(), 1);
        assert_eq!(data.arena().allocated(), "a-b".len() + "value = 17".len());
    }

    #[test]
    fn test_exact_alloc_path_matches_remnant_path() {
        let long: String = core::iter::repeat_n('é', 400).collect();

        let mut data = ErrataData::new();
        data.note_display(Severity::Error, &format_args!("[{long}]"));

        let expected = format!("[{long}]");
        assert_eq!(data.front().map(|note| note.text), Some(expected.as_str()));
        assert_eq!(data.arena().allocated(), expected.len());
    }

    #[test]
    fn test_formatted_text_identical_on_both_paths() {
        fn note_fancy(data: &mut ErrataData) {
            data.note_display(
                Severity::Info,
                &format_args!("{:>8}|{:#x}|{:?}", "pad", 255, "q"),
            );
        }
        let expected = format!("{:>8}|{:#x}|{:?}", "pad", 255, "q");

        // Plenty of room: remnant path.
        let mut roomy = ErrataData::new();
        note_fancy(&mut roomy);

        // Exhaust the remnant first so the message takes the exact path.
        let mut cramped = ErrataData::new();
        let free = cramped.arena.remnant().len();
        let filler = cramped.arena.alloc(free - 3);
        cramped.note_localized(Severity::Diag, 0, filler);
        let chunks_before = cramped.arena().chunk_count();
        note_fancy(&mut cramped);

        assert_eq!(roomy.front().map(|note| note.text), Some(expected.as_str()));
        assert_eq!(cramped.front().map(|note| note.text), Some(expected.as_str()));
        assert_eq!(cramped.arena().chunk_count(), chunks_before + 1);
    }

    #[test]
    fn test_absorb_preserves_order_and_nests() {
        let mut inner = ErrataData::new();
        inner.note_str(Severity::Info, "inner old");
        inner.note_str(Severity::Error, "inner new");

        let mut outer = ErrataData::new();
        outer.note_str(Severity::Diag, "outer");
        outer.absorb(&inner);

        assert_eq!(texts(&outer), ["inner new", "inner old", "outer"]);
        assert_eq!(outer.len(), inner.len() + 1);
        assert_eq!(outer.severity(), Severity::Error);

        let levels: Vec<u32> = outer.iter().map(|note| note.level).collect();
        assert_eq!(levels, [1, 1, 0]);
        // The source is unchanged.
        assert_eq!(texts(&inner), ["inner new", "inner old"]);
    }

    #[test]
    fn test_nest_under_matches_absorb_into_empty() {
        let mut source = ErrataData::new();
        source.note_str(Severity::Warn, "deep");
        source.set_level(1);
        source.note_str(Severity::Info, "deeper");

        let mut absorbed = ErrataData::new();
        absorbed.set_level(2);
        absorbed.absorb(&source);

        source.nest_under(2);

        let levels = |data: &ErrataData| -> Vec<(u32, String)> {
            data.iter().map(|note| (note.level, note.text.into())).collect()
        };
        assert_eq!(levels(&source), levels(&absorbed));
        assert_eq!(levels(&source), [(4, String::from("deeper")), (3, String::from("deep"))]);
        assert_eq!(source.level(), absorbed.level());
    }

    #[test]
    fn test_level_is_stamped_on_new_notes() {
        let mut data = ErrataData::new();
        data.note_str(Severity::Info, "top level");
        data.set_level(2);
        data.note_str(Severity::Info, "nested");
        let levels: Vec<u32> = data.iter().map(|note| note.level).collect();
        assert_eq!(levels, [2, 0]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut data = ErrataData::new();
        data.set_level(3);
        data.note_str(Severity::Error, "boom");
        data.clear();
        assert!(data.is_empty());
        assert_eq!(data.severity(), Severity::DEFAULT);
        assert_eq!(data.level(), 0);
        assert_eq!(data.arena().allocated(), 0);
    }

    #[test]
    fn test_unstable_display_keeps_valid_utf8() {
        use core::cell::Cell;

        // Renders a long text the first time and a shorter one afterwards.
        struct Shrinking(Cell<bool>);
        impl fmt::Display for Shrinking {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.replace(true) {
                    f.write_str("short")
                } else {
                    f.write_str(&"ü".repeat(1000))
                }
            }
        }

        let mut data = ErrataData::new();
        data.note_display(Severity::Warn, &Shrinking(Cell::new(false)));
        assert_eq!(data.front().map(|note| note.text), Some("short"));
    }
}
