//! Chunking front ends.
//!
//! - [`ChunkEngine`] - Push-based fused engine with `push()`/`finish()` API
//! - [`Chunker`] / [`ChunkIter`] - Single-pass chunking of a [`std::io::Read`]
//! - [`ChunkLengths`] - Boundary-only pass yielding chunk lengths
//! - [`ChunkStreamAssembler`] - Two-pass assembly of lengths and replayed bytes

mod assembler;
mod engine;
mod iter;
mod lengths;

pub use assembler::{ChunkStreamAssembler, Replay, TeeReader, tee};
pub use engine::ChunkEngine;
pub use iter::{ChunkIter, Chunker};
pub use lengths::ChunkLengths;
