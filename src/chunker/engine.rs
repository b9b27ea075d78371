//! Push-based chunking engine.
//!
//! [`ChunkEngine`] is the fused single-pass core shared by every chunking
//! front end in this crate. The caller feeds it byte slices of any size;
//! each byte goes through the rolling hash and into the chunk digest in
//! the same pass, so the engine never buffers chunk bytes:
//!
//! - `push()` - Feed data in any size (1 byte, 8KB, 1MB, etc.)
//! - `finish()` - Flush the final short chunk when the stream ends
//!
//! # Example
//!
//! ```
//! use rollcdc::{ChunkConfig, ChunkEngine};
//!
//! let mut engine = ChunkEngine::new(ChunkConfig::default());
//!
//! let mut chunks = engine.push(b"first");
//! chunks.extend(engine.push(b"second"));
//! chunks.extend(engine.finish());
//!
//! let total: usize = chunks.iter().map(|c| c.len()).sum();
//! assert_eq!(total, 11);
//! ```

use tracing::{debug, trace};

use crate::cdc::{Cut, RabinCdc};
use crate::chunk::{BoundaryKind, Chunk};
use crate::config::ChunkConfig;
use crate::hash::ChunkHasher;

/// A stateful CDC engine that turns streamed bytes into chunk descriptors.
///
/// # Determinism
///
/// Identical byte streams produce identical chunks regardless of how many
/// bytes are pushed at once or how many `push()` calls are made.
///
/// # Memory
///
/// Bytes are hashed as they are scanned. The engine holds the rolling
/// window and a digest state, never the bytes of the current chunk.
#[derive(Debug, Clone)]
pub struct ChunkEngine {
    cdc: RabinCdc,
    hasher: ChunkHasher,
    /// Offset of the first byte of the current chunk.
    offset: u64,
    /// Bytes of the current chunk consumed so far.
    pending: usize,
    emitted: u64,
    config: ChunkConfig,
}

impl ChunkEngine {
    /// Creates a new engine with the given configuration.
    ///
    /// The configuration is assumed valid; see [`ChunkConfig::validate`].
    pub fn new(config: ChunkConfig) -> Self {
        Self {
            cdc: RabinCdc::new(&config),
            hasher: ChunkHasher::new(config.hash_config().algorithm),
            offset: 0,
            pending: 0,
            emitted: 0,
            config,
        }
    }

    /// Consumes `data` up to and including the first boundary.
    ///
    /// Returns the number of bytes consumed and the chunk that boundary
    /// closed, if any. When no boundary is found the whole slice is
    /// consumed and becomes part of the pending chunk.
    pub fn scan(&mut self, data: &[u8]) -> (usize, Option<Chunk>) {
        match self.cdc.find_boundary(data) {
            Some((len, cut)) => {
                self.hasher.update(&data[..len]);
                self.pending += len;
                let boundary = match cut {
                    Cut::Forced => BoundaryKind::Forced,
                    _ => BoundaryKind::Content,
                };
                (len, Some(self.emit(boundary)))
            }
            None => {
                self.hasher.update(data);
                self.pending += data.len();
                (data.len(), None)
            }
        }
    }

    /// Pushes data into the engine and returns every chunk it completes.
    ///
    /// Bytes after the last boundary stay pending (as hashed state) and
    /// are continued by the next `push()` or flushed by `finish()`.
    pub fn push(&mut self, data: &[u8]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut rest = data;

        while !rest.is_empty() {
            let (consumed, chunk) = self.scan(rest);
            chunks.extend(chunk);
            rest = &rest[consumed..];
        }

        chunks
    }

    /// Ends the stream and returns the final chunk, if any bytes are pending.
    ///
    /// The final chunk may be shorter than `min_size`. An empty stream
    /// produces no chunk at all.
    pub fn finish(&mut self) -> Option<Chunk> {
        if self.pending == 0 {
            debug!(offset = self.offset, chunks = self.emitted, "end of stream");
            return None;
        }

        let chunk = self.emit(BoundaryKind::EndOfStream);
        debug!(offset = self.offset, chunks = self.emitted, "end of stream");
        Some(chunk)
    }

    fn emit(&mut self, boundary: BoundaryKind) -> Chunk {
        let chunk = Chunk::new(
            self.offset,
            self.pending,
            self.hasher.finalize_reset(),
            boundary,
        );

        if boundary == BoundaryKind::Forced {
            debug!(offset = chunk.offset, len = chunk.len, "forced boundary at max_size");
        }
        trace!(offset = chunk.offset, len = chunk.len, hash = %chunk.hash, "chunk");

        self.offset += self.pending as u64;
        self.pending = 0;
        self.emitted += 1;
        chunk
    }

    /// Resets the engine for a new stream.
    ///
    /// Clears the rolling window, the pending chunk and the offset.
    pub fn reset(&mut self) {
        self.cdc.reset();
        self.hasher.reset();
        self.offset = 0;
        self.pending = 0;
        self.emitted = 0;
    }

    /// Returns the offset of the next chunk to be emitted.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the total number of bytes consumed from the stream.
    pub fn position(&self) -> u64 {
        self.offset + self.pending as u64
    }

    /// Returns the number of bytes consumed since the last boundary.
    pub fn pending_len(&self) -> usize {
        self.pending
    }

    /// Returns the configuration used by this engine.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}

impl Default for ChunkEngine {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}
