//! Two-pass chunk assembly.
//!
//! The boundary pass ([`ChunkLengths`]) and the hashing pass read the same
//! bytes through two handles. [`ChunkStreamAssembler`] keeps them in
//! lockstep: it pulls one length, re-reads exactly that many bytes from
//! the replay handle, hashes them and only then asks for the next length.
//!
//! [`tee`] builds such a pair over a single reader: every byte the boundary
//! pass reads is copied into a shared buffer that the replay handle drains.
//! Lockstep consumption bounds that buffer to one chunk plus one read-ahead
//! block.

use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;

use bytes::{Buf, BytesMut};
use tracing::warn;

use crate::chunk::{BoundaryKind, Chunk};
use crate::config::HashAlgorithm;
use crate::error::ChunkError;
use crate::hash::ChunkHasher;
use crate::util::read_full;

use super::lengths::ChunkLengths;

/// Reader half of a [`tee`]: passes reads through and records the bytes.
#[derive(Debug)]
pub struct TeeReader<R> {
    inner: R,
    copy: Rc<RefCell<BytesMut>>,
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.copy.borrow_mut().extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Replay half of a [`tee`]: yields the bytes the [`TeeReader`] has seen.
///
/// Reports end of stream whenever it has caught up with the tee.
#[derive(Debug)]
pub struct Replay {
    copy: Rc<RefCell<BytesMut>>,
}

impl Replay {
    /// Returns the number of recorded bytes not yet replayed.
    pub fn buffered(&self) -> usize {
        self.copy.borrow().len()
    }
}

impl Read for Replay {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut copy = self.copy.borrow_mut();
        let n = buf.len().min(copy.len());
        buf[..n].copy_from_slice(&copy[..n]);
        copy.advance(n);
        Ok(n)
    }
}

/// Splits `reader` into a pass-through reader and a replay of its bytes.
///
/// Both halves share one buffer and must stay on the same thread.
pub fn tee<R: Read>(reader: R) -> (TeeReader<R>, Replay) {
    let copy = Rc::new(RefCell::new(BytesMut::new()));
    (
        TeeReader {
            inner: reader,
            copy: Rc::clone(&copy),
        },
        Replay { copy },
    )
}

/// Turns a length sequence plus a replay of the same bytes into chunks.
///
/// A replay that runs dry before a chunk is complete means the two passes
/// disagree about the stream. That is reported as
/// [`ChunkError::TruncatedStream`] and ends the sequence; the short chunk
/// is never hashed or padded.
pub struct ChunkStreamAssembler<S, P> {
    lengths: ChunkLengths<S>,
    replay: P,
    hasher: ChunkHasher,
    scratch: Vec<u8>,
    offset: u64,
    finished: bool,
}

impl<S: Read, P: Read> ChunkStreamAssembler<S, P> {
    /// Creates an assembler over a boundary pass and a replay handle.
    pub fn new(lengths: ChunkLengths<S>, replay: P, algorithm: HashAlgorithm) -> Self {
        Self {
            lengths,
            replay,
            hasher: ChunkHasher::new(algorithm),
            scratch: Vec::new(),
            offset: 0,
            finished: false,
        }
    }

    fn fail(&mut self, err: ChunkError) -> Option<Result<Chunk, ChunkError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<S: Read, P: Read> Iterator for ChunkStreamAssembler<S, P> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let len = match self.lengths.next() {
            Some(Ok(len)) => len,
            Some(Err(e)) => return self.fail(e),
            None => {
                self.finished = true;
                return None;
            }
        };

        self.scratch.resize(len, 0);
        let actual = match read_full(&mut self.replay, &mut self.scratch) {
            Ok(n) => n,
            Err(e) => return self.fail(ChunkError::read(self.offset, e)),
        };

        if actual < len {
            warn!(offset = self.offset, expected = len, actual, "replay ended inside a chunk");
            return self.fail(ChunkError::TruncatedStream {
                offset: self.offset,
                expected: len,
                actual,
            });
        }

        self.hasher.update(&self.scratch);
        let boundary = self
            .lengths
            .last_boundary()
            .unwrap_or(BoundaryKind::EndOfStream);
        let chunk = Chunk::new(self.offset, len, self.hasher.finalize_reset(), boundary);
        self.offset += len as u64;

        Some(Ok(chunk))
    }
}

impl<S: Read, P: Read> std::iter::FusedIterator for ChunkStreamAssembler<S, P> {}
