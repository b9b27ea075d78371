//! rollcdc
//!
//! Content-defined chunking with a Rabin-Karp rolling hash.
//!
//! `rollcdc` splits a byte stream into variable-length chunks whose
//! boundaries depend on the content itself, and names each chunk by a
//! 32-byte digest of its bytes. An insertion or deletion only disturbs the
//! chunks around the edit; boundaries further on fall back in step. That
//! makes the chunks useful for:
//!
//! - deduplication
//! - delta synchronization
//! - content-addressable storage
//!
//! The crate does not store, compress or transmit chunks. It only does one
//! thing: **Read bytes → yield chunk descriptors**
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use rollcdc::{Chunker, ChunkConfig, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("data.bin")?;
//!     let chunker = Chunker::new(ChunkConfig::default());
//!
//!     for chunk in chunker.chunk(file) {
//!         let chunk = chunk?;
//!         println!("{} {} bytes", chunk.hash, chunk.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Report
//!
//! ```
//! use rollcdc::{ChunkConfig, ChunkReport};
//!
//! let report = ChunkReport::from_reader(&[0u8; 10_000][..], ChunkConfig::default())?;
//! assert_eq!(report.chunks.len(), 3);
//! assert!(report.to_string().starts_with("10 kB\n3\n"));
//! # Ok::<(), rollcdc::ChunkError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use rollcdc::{chunk_async, ChunkConfig};
//!
//! async fn demo<R: futures_io::AsyncRead>(reader: R) -> Result<(), rollcdc::ChunkError> {
//!     let mut stream = std::pin::pin!(chunk_async(reader, ChunkConfig::default()));
//!
//!     while let Some(chunk) = stream.next().await {
//!         println!("chunk {}", chunk?.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cdc;
mod chunk;
mod chunker;
mod config;
mod error;
mod hash;
mod report;
mod util;

#[cfg(feature = "async-io")]
mod async_stream;

pub use cdc::{BoundaryPolicy, Cut, RabinCdc, RollingWindow};
pub use chunk::{BoundaryKind, Chunk, ChunkHash};
pub use chunker::{
    ChunkEngine, ChunkIter, ChunkLengths, ChunkStreamAssembler, Chunker, Replay, TeeReader, tee,
};
pub use config::{
    ChunkConfig, DEFAULT_AVG_CHUNK_SIZE, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE,
    DEFAULT_POLYNOMIAL, DEFAULT_WINDOW_SIZE, HashAlgorithm, HashConfig,
};
pub use error::ChunkError;
pub use hash::ChunkHasher;
pub use report::{ChunkReport, format_size};

#[cfg(feature = "async-io")]
pub use async_stream::{ChunkStream, chunk_async};
