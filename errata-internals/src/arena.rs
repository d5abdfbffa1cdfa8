//! Chunked bump allocator for annotation text.
//!
//! A [`MessageArena`] hands out byte regions identified by [`ArenaSpan`]s. It
//! never moves or frees a region once handed out; the whole arena is released
//! at once when it is dropped (or reset with [`MessageArena::clear`]).
//!
//! The arena exposes the unused tail of its current chunk through
//! [`MessageArena::remnant`]. Callers may write into the remnant speculatively
//! and then claim exactly the bytes they used with [`MessageArena::alloc`],
//! which carves from the start of the remnant whenever the request fits.

use alloc::{boxed::Box, vec, vec::Vec};

/// Size of the first chunk allocated by an arena.
const INITIAL_CHUNK_SIZE: usize = 256;

/// Chunk sizes stop doubling at this size. Larger requests still get a chunk
/// of exactly their size.
const MAX_CHUNK_SIZE: usize = 16 * 1024;

/// Handle to a region previously returned by [`MessageArena::alloc`].
///
/// A span is only meaningful for the arena that produced it, and only until
/// that arena is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ArenaSpan {
    /// Index of the chunk holding the region.
    chunk: u32,
    /// Byte offset of the region inside the chunk.
    offset: u32,
    /// Length of the region in bytes.
    len: u32,
}

impl ArenaSpan {
    /// Length of the region in bytes.
    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    /// Returns `true` if the region is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The first `len` bytes of this span.
    #[inline]
    pub(crate) fn prefix(self, len: usize) -> ArenaSpan {
        debug_assert!(len <= self.len());
        ArenaSpan {
            len: to_u32(len.min(self.len())),
            ..self
        }
    }
}

/// One block of arena memory.
struct Chunk {
    /// The backing storage. Never reallocated.
    storage: Box<[u8]>,
    /// Number of bytes handed out from the front of `storage`.
    used: usize,
}

impl Chunk {
    /// Allocates a zeroed chunk of `size` bytes.
    fn new(size: usize) -> Self {
        Self {
            storage: vec![0u8; size].into_boxed_slice(),
            used: 0,
        }
    }

    /// Number of bytes still free at the end of the chunk.
    #[inline]
    fn free(&self) -> usize {
        self.storage.len() - self.used
    }
}

/// A growable bump allocator, one per errata.
///
/// Creating an arena does not allocate; the first chunk is allocated on the
/// first call to [`alloc`](Self::alloc) (or [`remnant`](Self::remnant)).
pub struct MessageArena {
    /// Allocated chunks. Only the last one is allocated from.
    chunks: Vec<Chunk>,
    /// Size of the next chunk to allocate when the current one runs out.
    next_chunk_size: usize,
    /// Total bytes handed out across all chunks.
    allocated: usize,
}

impl MessageArena {
    /// Creates an empty arena without allocating.
    pub const fn new() -> Self {
        Self {
            chunks: Vec::new(),
            next_chunk_size: INITIAL_CHUNK_SIZE,
            allocated: 0,
        }
    }

    /// Creates an arena whose first chunk holds at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Self::new();
        if capacity > 0 {
            arena.push_chunk(capacity);
        }
        arena
    }

    /// Returns the unused bytes of the current chunk.
    ///
    /// If the arena has no chunk yet, one is allocated so the remnant is
    /// usable for small writes. The remnant may still be shorter than what the
    /// caller needs; nothing written here is kept unless it is claimed with
    /// [`alloc`](Self::alloc) before any other allocation.
    pub fn remnant(&mut self) -> &mut [u8] {
        if self.chunks.is_empty() {
            self.push_chunk(self.next_chunk_size);
        }
        match self.chunks.last_mut() {
            Some(chunk) => &mut chunk.storage[chunk.used..],
            None => &mut [],
        }
    }

    /// Allocates exactly `n` bytes.
    ///
    /// When `n` fits in the current remnant the region starts at the first
    /// byte of the remnant, so bytes written there by a previous
    /// [`remnant`](Self::remnant) call are preserved. Otherwise a new chunk is
    /// started and the rest of the current one is abandoned.
    pub fn alloc(&mut self, n: usize) -> ArenaSpan {
        let fits = self.chunks.last().is_some_and(|chunk| chunk.free() >= n);
        if !fits {
            self.push_chunk(n.max(self.next_chunk_size));
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        let offset = chunk.used;
        chunk.used += n;
        self.allocated += n;

        ArenaSpan {
            chunk: to_u32(chunk_index),
            offset: to_u32(offset),
            len: to_u32(n),
        }
    }

    /// Returns the bytes of a previously allocated region.
    ///
    /// # Panics
    ///
    /// Panics if `span` was not produced by this arena since its last
    /// [`clear`](Self::clear).
    #[inline]
    pub fn get(&self, span: ArenaSpan) -> &[u8] {
        let start = span.offset as usize;
        &self.chunks[span.chunk as usize].storage[start..start + span.len()]
    }

    /// Returns the bytes of a previously allocated region mutably.
    ///
    /// # Panics
    ///
    /// Panics if `span` was not produced by this arena since its last
    /// [`clear`](Self::clear).
    #[inline]
    pub fn get_mut(&mut self, span: ArenaSpan) -> &mut [u8] {
        let start = span.offset as usize;
        &mut self.chunks[span.chunk as usize].storage[start..start + span.len()]
    }

    /// Forgets every allocation, invalidating all outstanding spans.
    ///
    /// The largest chunk is kept for reuse; the others are freed.
    pub fn clear(&mut self) {
        let largest = (0..self.chunks.len()).max_by_key(|&i| self.chunks[i].storage.len());
        if let Some(largest) = largest {
            let mut chunk = self.chunks.swap_remove(largest);
            chunk.used = 0;
            self.chunks.clear();
            self.chunks.push(chunk);
        }
        self.allocated = 0;
    }

    /// Number of chunks currently held.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total bytes handed out by [`alloc`](Self::alloc) since the last clear.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Total bytes of chunk storage held.
    pub fn capacity(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.storage.len()).sum()
    }

    /// Starts a new chunk of `size` bytes and advances the growth schedule.
    fn push_chunk(&mut self, size: usize) {
        self.chunks.push(Chunk::new(size));
        self.next_chunk_size = (self.next_chunk_size * 2).min(MAX_CHUNK_SIZE);
    }
}

impl Default for MessageArena {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MessageArena {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MessageArena")
            .field("chunks", &self.chunks.len())
            .field("allocated", &self.allocated)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Narrows an arena offset or length. Text regions beyond 4 GiB are not
/// supported.
#[inline]
fn to_u32(value: usize) -> u32 {
    u32::try_from(value).expect("errata message arena region exceeds u32::MAX bytes")
}
