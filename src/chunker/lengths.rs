//! Boundary-only pass over a reader.

use std::io::{self, BufRead, BufReader, Read};

use crate::cdc::{Cut, RabinCdc};
use crate::chunk::BoundaryKind;
use crate::config::ChunkConfig;
use crate::error::ChunkError;
use crate::util::READ_BUFFER_SIZE;

/// Lazy sequence of chunk lengths.
///
/// Each call to `next()` advances the logical stream position by exactly
/// one chunk and returns that chunk's length. Reads go through an internal
/// [`BufReader`], so the underlying reader may be ahead by up to one
/// buffer; [`ChunkLengths::position`] is the exact logical position.
///
/// End of input ends the sequence. A read error is yielded once and ends
/// it as well; the chunk in flight is dropped.
///
/// ```
/// use rollcdc::{ChunkConfig, Chunker};
///
/// let data = vec![0u8; 10_000];
/// let lengths: Vec<usize> = Chunker::new(ChunkConfig::default())
///     .lengths(&data[..])
///     .collect::<Result<_, _>>()?;
///
/// // Zeros never match the content pattern, so every cut is forced.
/// assert_eq!(lengths, vec![4096, 4096, 1808]);
/// # Ok::<(), rollcdc::ChunkError>(())
/// ```
pub struct ChunkLengths<R> {
    reader: BufReader<R>,
    cdc: RabinCdc,
    position: u64,
    last: Option<BoundaryKind>,
    finished: bool,
}

impl<R: Read> ChunkLengths<R> {
    pub(crate) fn new(reader: R, config: ChunkConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, reader),
            cdc: RabinCdc::new(&config),
            position: 0,
            last: None,
            finished: false,
        }
    }

    /// Returns the stream offset just past the last yielded chunk.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns what ended the most recently yielded chunk.
    pub fn last_boundary(&self) -> Option<BoundaryKind> {
        self.last
    }

    fn yield_len(
        &mut self,
        len: usize,
        boundary: BoundaryKind,
    ) -> Option<Result<usize, ChunkError>> {
        self.position += len as u64;
        self.last = Some(boundary);
        Some(Ok(len))
    }
}

impl<R: Read> Iterator for ChunkLengths<R> {
    type Item = Result<usize, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut len = 0usize;
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ChunkError::read(self.position + len as u64, e)));
                }
            };

            if buf.is_empty() {
                self.finished = true;
                if len == 0 {
                    return None;
                }
                return self.yield_len(len, BoundaryKind::EndOfStream);
            }

            match self.cdc.find_boundary(buf) {
                Some((n, cut)) => {
                    self.reader.consume(n);
                    let boundary = if cut == Cut::Forced {
                        BoundaryKind::Forced
                    } else {
                        BoundaryKind::Content
                    };
                    return self.yield_len(len + n, boundary);
                }
                None => {
                    let n = buf.len();
                    self.reader.consume(n);
                    len += n;
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for ChunkLengths<R> {}
