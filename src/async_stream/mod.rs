//! Async streaming support for chunking.
//!
//! Built on `futures_io::AsyncRead`, so it runs on tokio (through
//! `tokio_util::compat`), async-std, smol or any other futures runtime.
//!
//! - [`chunk_async`] - Creates an async stream of chunks from an async reader
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{ChunkStream, chunk_async};
