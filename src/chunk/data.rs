//! The Chunk type - describes one content-defined chunk.

use std::fmt;
use std::ops::Range;

use super::ChunkHash;

/// Why a chunk ended where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// The rolling hash matched the boundary pattern.
    Content,
    /// The chunk reached the maximum size.
    Forced,
    /// The stream ended; this is the final, possibly short, chunk.
    EndOfStream,
}

/// A content-defined chunk descriptor.
///
/// A chunk is a contiguous, non-overlapping slice of the source stream.
/// The descriptor carries its position, length and digest but no bytes and
/// no reference back to the source.
///
/// # Example
///
/// ```
/// use rollcdc::{BoundaryKind, Chunk, ChunkHash};
///
/// let chunk = Chunk::new(100, 11, ChunkHash::new([0; 32]), BoundaryKind::Content);
///
/// assert_eq!(chunk.range(), 100..111);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    /// Offset of the first byte in the input stream.
    pub offset: u64,

    /// Number of bytes in the chunk.
    pub len: usize,

    /// Content identity of the chunk's bytes.
    pub hash: ChunkHash,

    /// What ended the chunk.
    pub boundary: BoundaryKind,
}

impl Chunk {
    /// Creates a new chunk descriptor.
    pub fn new(offset: u64, len: usize, hash: ChunkHash, boundary: BoundaryKind) -> Self {
        Self {
            offset,
            len,
            hash,
            boundary,
        }
    }

    /// Returns the length of the chunk.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chunk has no data. Emitted chunks never do.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the start offset.
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }

    /// Returns the chunk as a range of stream offsets.
    pub fn range(&self) -> Range<u64> {
        self.start()..self.end()
    }

    /// Returns the chunk's bytes within `data`, the in-memory source it
    /// was cut from.
    ///
    /// # Panics
    ///
    /// Panics if the chunk lies outside `data`.
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.offset as usize..self.end() as usize]
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk({} bytes @ {}, hash={})",
            self.len, self.offset, self.hash
        )
    }
}
