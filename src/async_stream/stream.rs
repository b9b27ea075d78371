//! Async stream adapter over [`ChunkEngine`].

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::chunk::Chunk;
use crate::chunker::ChunkEngine;
use crate::config::ChunkConfig;
use crate::error::ChunkError;
use crate::util::READ_BUFFER_SIZE;

pin_project! {
    /// A stream that yields chunks from an async reader.
    ///
    /// Produces exactly the chunks [`Chunker::chunk`](crate::Chunker::chunk)
    /// would for the same bytes. Like the sync iterator it ends after the
    /// first read error.
    pub struct ChunkStream<R> {
        #[pin]
        reader: R,
        engine: ChunkEngine,
        buffer: Box<[u8]>,
        start: usize,
        end: usize,
        finished: bool,
    }
}

impl<R> ChunkStream<R> {
    /// Creates a new chunk stream from an async reader.
    pub fn new(reader: R, config: ChunkConfig) -> Self {
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
}

impl<R: AsyncRead> Stream for ChunkStream<R> {
    type Item = Result<Chunk, ChunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            if *this.start < *this.end {
                let (consumed, chunk) = this.engine.scan(&this.buffer[*this.start..*this.end]);
                *this.start += consumed;
                if let Some(chunk) = chunk {
                    return Poll::Ready(Some(Ok(chunk)));
                }
            }

            match this.reader.as_mut().poll_read(cx, &mut this.buffer[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    let offset = this.engine.position();
                    return Poll::Ready(Some(Err(ChunkError::read(offset, e))));
                }
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    return Poll::Ready(this.engine.finish().map(Ok));
                }
                Poll::Ready(Ok(n)) => {
                    *this.start = 0;
                    *this.end = n;
                }
            }
        }
    }
}

/// Creates a chunk stream from an async reader.
///
/// For tokio readers, convert with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use rollcdc::{chunk_async, ChunkConfig};
///
/// let file = tokio::fs::File::open("data.bin").await?;
/// let stream = chunk_async(file.compat(), ChunkConfig::default());
/// ```
pub fn chunk_async<R: AsyncRead>(reader: R, config: ChunkConfig) -> ChunkStream<R> {
    ChunkStream::new(reader, config)
}
