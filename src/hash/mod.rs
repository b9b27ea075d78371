//! Strong hash implementations for chunk identity.
//!
//! Two chunks with equal digests are treated as interchangeable, so the
//! digest is a cryptographic hash of the chunk's raw bytes.
//!
//! - [`ChunkHasher`] - BLAKE3 or SHA-256, selected by [`crate::HashAlgorithm`]

mod hasher;

pub use hasher::ChunkHasher;
