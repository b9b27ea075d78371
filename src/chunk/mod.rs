//! Chunk types.
//!
//! - [`Chunk`] - Content-defined chunk descriptor: offset, length, hash
//! - [`BoundaryKind`] - Why a chunk ended
//! - [`ChunkHash`] - 32-byte cryptographic hash

mod data;
mod hash;

pub use data::{BoundaryKind, Chunk};
pub use hash::ChunkHash;
