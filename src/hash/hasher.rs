//! Incremental chunk digests.

use sha2::{Digest, Sha256};

use crate::chunk::ChunkHash;
use crate::config::HashAlgorithm;

#[derive(Debug, Clone)]
enum State {
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

/// Computes the content identity of a chunk.
///
/// Bytes may be fed in any number of `update` calls; the digest only
/// depends on their concatenation.
#[derive(Debug, Clone)]
pub struct ChunkHasher {
    state: State,
}

impl ChunkHasher {
    /// Creates a new hasher for `algorithm`.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Blake3 => State::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => State::Sha256(Sha256::new()),
        };
        Self { state }
    }

    /// Returns the algorithm this hasher computes.
    pub fn algorithm(&self) -> HashAlgorithm {
        match self.state {
            State::Blake3(_) => HashAlgorithm::Blake3,
            State::Sha256(_) => HashAlgorithm::Sha256,
        }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            State::Blake3(h) => {
                h.update(data);
            }
            State::Sha256(h) => h.update(data),
        }
    }

    /// Returns the digest of everything fed so far and resets the hasher
    /// for the next chunk.
    pub fn finalize_reset(&mut self) -> ChunkHash {
        match &mut self.state {
            State::Blake3(h) => {
                let hash = ChunkHash::new(h.finalize().into());
                h.reset();
                hash
            }
            State::Sha256(h) => ChunkHash::new(h.finalize_reset().into()),
        }
    }

    /// Resets the hasher to its initial state.
    pub fn reset(&mut self) {
        match &mut self.state {
            State::Blake3(h) => {
                h.reset();
            }
            State::Sha256(h) => Digest::reset(h),
        }
    }

    /// Hashes `data` in one shot.
    ///
    /// ```
    /// use rollcdc::{ChunkHasher, HashAlgorithm};
    ///
    /// let a = ChunkHasher::digest(HashAlgorithm::Blake3, b"hello");
    /// let b = ChunkHasher::digest(HashAlgorithm::Blake3, b"hello");
    /// assert_eq!(a, b);
    /// ```
    pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> ChunkHash {
        match algorithm {
            HashAlgorithm::Blake3 => ChunkHash::new(blake3::hash(data).into()),
            HashAlgorithm::Sha256 => ChunkHash::new(Sha256::digest(data).into()),
        }
    }
}

impl Default for ChunkHasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}
