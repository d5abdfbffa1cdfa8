//! Rendering formatted text into bounded byte spans.
//!
//! [`FixedBufferWriter`] implements [`core::fmt::Write`] over a caller-supplied
//! byte slice. When the output does not fit, it keeps counting the bytes it
//! would have written, so a single failed attempt is enough to learn the exact
//! size of a buffer that will fit.

use core::fmt;

/// A [`fmt::Write`] sink over a fixed byte slice that measures overflow.
///
/// Writes never fail. Bytes beyond the end of the buffer are discarded but
/// still counted in [`extent`](Self::extent).
///
/// The contents of the buffer are valid UTF-8 as long as
/// [`is_overflowed`](Self::is_overflowed) is `false`; after an overflow the
/// last written character may have been cut.
pub struct FixedBufferWriter<'a> {
    /// The target buffer.
    buf: &'a mut [u8],
    /// Number of bytes the output needs, including any that did not fit.
    extent: usize,
}

impl<'a> FixedBufferWriter<'a> {
    /// Creates a writer over `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, extent: 0 }
    }

    /// Number of bytes the output so far requires.
    #[inline]
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// Capacity of the underlying buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the output did not fit in the buffer.
    #[inline]
    pub fn is_overflowed(&self) -> bool {
        self.extent > self.buf.len()
    }

    /// The bytes written into the buffer, truncated to its capacity.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.extent.min(self.buf.len())]
    }
}

impl fmt::Write for FixedBufferWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.extent < self.buf.len() {
            let n = bytes.len().min(self.buf.len() - self.extent);
            self.buf[self.extent..self.extent + n].copy_from_slice(&bytes[..n]);
        }
        self.extent += bytes.len();
        Ok(())
    }
}

/// Renders `value` into `buf`.
///
/// Returns the number of bytes the rendering needs and whether it overflowed
/// `buf`. When it did not overflow, the first `extent` bytes of `buf` hold the
/// complete, valid UTF-8 text.
///
/// Formatting errors raised by the value itself are treated like an early end
/// of output: whatever was written before the error is kept.
pub fn render(buf: &mut [u8], value: &dyn fmt::Display) -> (usize, bool) {
    let mut writer = FixedBufferWriter::new(buf);
    let _ = fmt::write(&mut writer, format_args!("{value}"));
    (writer.extent(), writer.is_overflowed())
}

#[cfg(test)]
mod tests {
    use core::fmt::Write;

    use super::*;

    #[test]
    fn test_fits() {
        let mut buf = [0u8; 16];
        let (extent, overflowed) = render(&mut buf, &format_args!("{}-{}", 12, "ab"));
        assert_eq!(extent, 5);
        assert!(!overflowed);
        assert_eq!(&buf[..extent], b"12-ab");
    }

    #[test]
    fn test_exact_fit_is_not_overflow() {
        let mut buf = [0u8; 5];
        let (extent, overflowed) = render(&mut buf, &"hello");
        assert_eq!(extent, 5);
        assert!(!overflowed);
    }

    #[test]
    fn test_overflow_measures_full_size() {
        let mut buf = [0u8; 4];
        let mut writer = FixedBufferWriter::new(&mut buf);
        write!(writer, "{}", "abcdefghij").unwrap();
        write!(writer, "{}", 42).unwrap();
        assert!(writer.is_overflowed());
        assert_eq!(writer.extent(), 12);
        assert_eq!(writer.written(), b"abcd");
    }

    #[test]
    fn test_empty_buffer() {
        let (extent, overflowed) = render(&mut [], &"x");
        assert_eq!(extent, 1);
        assert!(overflowed);

        let (extent, overflowed) = render(&mut [], &"");
        assert_eq!(extent, 0);
        assert!(!overflowed);
    }
}
