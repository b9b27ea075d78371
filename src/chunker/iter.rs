//! Synchronous chunking front end - Chunker and ChunkIter.
//!
//! - [`Chunker`] - Holds a configuration and starts chunking operations
//! - [`ChunkIter`] - Iterator that yields chunks from a [`std::io::Read`] source
//!
//! # Example
//!
//! ```no_run
//! use rollcdc::{Chunker, ChunkConfig};
//! use std::fs::File;
//!
//! let file = File::open("data.bin")?;
//! let chunker = Chunker::new(ChunkConfig::default());
//!
//! for chunk in chunker.chunk(file) {
//!     let chunk = chunk?;
//!     println!("{} {}", chunk.len(), chunk.hash);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Read;

use crate::chunk::Chunk;
use crate::config::ChunkConfig;
use crate::error::ChunkError;
use crate::util::{READ_BUFFER_SIZE, read_retrying};

use super::assembler::{ChunkStreamAssembler, Replay, TeeReader, tee};
use super::engine::ChunkEngine;
use super::lengths::ChunkLengths;

/// A chunker that processes byte streams into content-defined chunks.
///
/// `Chunker` is the high-level API for synchronous chunking. It holds a
/// configuration and provides methods to chunk data from various sources.
///
/// # Example
///
/// ```
/// use rollcdc::{Chunker, ChunkConfig};
/// use std::io::Cursor;
///
/// let data = vec![7u8; 10_000];
/// let chunker = Chunker::new(ChunkConfig::default());
/// let chunks: Vec<_> = chunker.chunk(Cursor::new(&data)).collect::<Result<_, _>>()?;
///
/// let total: usize = chunks.iter().map(|c| c.len()).sum();
/// assert_eq!(total, data.len());
/// # Ok::<(), rollcdc::ChunkError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker with the given configuration.
    ///
    /// The configuration is not checked; use [`Chunker::try_new`] for
    /// values that come from outside the program.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Creates a new chunker after validating the configuration.
    pub fn try_new(config: ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Creates a chunking iterator from a reader.
    ///
    /// Each byte is read once: boundary detection and hashing happen in the
    /// same pass, so no chunk bytes are buffered.
    pub fn chunk<R: Read>(&self, reader: R) -> ChunkIter<R> {
        ChunkIter::new(reader, self.config)
    }

    /// Chunks an in-memory buffer.
    ///
    /// Use [`Chunk::slice`] to get at each chunk's bytes.
    ///
    /// ```
    /// use rollcdc::{Chunker, ChunkConfig};
    ///
    /// let chunker = Chunker::new(ChunkConfig::default());
    /// let chunks = chunker.chunk_bytes(b"hello world");
    ///
    /// assert_eq!(chunks.len(), 1);
    /// ```
    pub fn chunk_bytes(&self, data: &[u8]) -> Vec<Chunk> {
        let mut engine = ChunkEngine::new(self.config);
        let mut chunks = engine.push(data);
        chunks.extend(engine.finish());
        chunks
    }

    /// Creates an iterator over chunk lengths only.
    pub fn lengths<R: Read>(&self, reader: R) -> ChunkLengths<R> {
        ChunkLengths::new(reader, self.config)
    }

    /// Chunks `reader` in two passes: one for boundaries, one re-reading
    /// each chunk's bytes from an in-process tee to hash them.
    ///
    /// Produces the same chunks as [`Chunker::chunk`]. Prefer that; this
    /// path exists for callers that need the lengths and the bytes as
    /// separate stages.
    pub fn assemble<R: Read>(&self, reader: R) -> ChunkStreamAssembler<TeeReader<R>, Replay> {
        let (source, replay) = tee(reader);
        ChunkStreamAssembler::new(
            self.lengths(source),
            replay,
            self.config.hash_config().algorithm,
        )
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}

/// An iterator that yields chunks from a reader.
///
/// `ChunkIter` reads from a [`std::io::Read`] source in blocks of up to
/// 8 KiB and yields chunks as boundaries are found. It is lazy, forward
/// only and cannot be restarted.
///
/// A read error is yielded once as [`ChunkError::ReadFailure`], after which
/// the iterator is exhausted. The chunk in flight is never emitted.
pub struct ChunkIter<R> {
    reader: R,
    engine: ChunkEngine,
    buffer: Box<[u8]>,
    start: usize,
    end: usize,
    finished: bool,
}

impl<R: Read> ChunkIter<R> {
    fn new(reader: R, config: ChunkConfig) -> Self {
        Self {
            reader,
            engine: ChunkEngine::new(config),
            buffer: vec![0u8; READ_BUFFER_SIZE].into_boxed_slice(),
            start: 0,
            end: 0,
            finished: false,
        }
    }

    /// Returns the number of bytes consumed from the reader so far.
    pub fn position(&self) -> u64 {
        self.engine.position()
    }

    /// Consumes the iterator and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ChunkIter<R> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if self.start < self.end {
                let (consumed, chunk) = self.engine.scan(&self.buffer[self.start..self.end]);
                self.start += consumed;
                if let Some(chunk) = chunk {
                    return Some(Ok(chunk));
                }
            }

            match read_retrying(&mut self.reader, &mut self.buffer) {
                Ok(0) => {
                    self.finished = true;
                    return self.engine.finish().map(Ok);
                }
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ChunkError::read(self.engine.position(), e)));
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for ChunkIter<R> {}
