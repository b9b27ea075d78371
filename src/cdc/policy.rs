//! Boundary decision rule.
//!
//! A position is a boundary when the chunk has reached `min_size` bytes
//! and either the top `mask_bits` bits of the rolling hash are all set
//! (content boundary) or the chunk has reached `max_size` (forced
//! boundary). The check is made once per byte, left to right, and never
//! revisited.
//!
//! The window hash is a polynomial mod 2^64, so bit `j` only sees bits
//! `0..=j` of each byte. Only the top bits see every bit of every byte,
//! which is why the pattern lives there.

/// Outcome of evaluating one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cut {
    /// Not a boundary.
    No,
    /// The rolling hash matched the boundary pattern.
    Content,
    /// The chunk reached `max_size`.
    Forced,
}

impl Cut {
    /// Returns true for both content and forced boundaries.
    #[inline]
    pub fn is_boundary(self) -> bool {
        !matches!(self, Cut::No)
    }
}

/// Expected chunk length when matching `bits` hash bits, including the
/// truncation at `max_size`.
///
/// With a match probability `p = 2^-bits` per position and
/// `n = max_size - min_size` eligible positions, this is
/// `min_size + (1 - p) * (1 - (1 - p)^n) / p`.
pub fn expected_chunk_size(min_size: usize, max_size: usize, bits: u32) -> f64 {
    let p = 0.5f64.powi(bits as i32);
    let eligible = max_size.saturating_sub(min_size) as f64;
    let miss = 1.0 - p;
    min_size as f64 + miss * (1.0 - miss.powf(eligible)) / p
}

/// Returns the number of hash bits to match for the given sizes.
///
/// Picks the width whose [`expected_chunk_size`] is closest to `avg_size`,
/// the smaller width on a tie.
pub fn mask_bits(min_size: usize, avg_size: usize, max_size: usize) -> u32 {
    let target = avg_size as f64;
    let mut best = 1;
    let mut best_error = f64::INFINITY;
    for bits in 1..=63 {
        let error = (expected_chunk_size(min_size, max_size, bits) - target).abs();
        if error < best_error {
            best = bits;
            best_error = error;
        }
    }
    best
}

/// Decides whether the current position ends a chunk.
///
/// # Example
///
/// ```
/// use rollcdc::{BoundaryPolicy, Cut};
///
/// let policy = BoundaryPolicy::new(4, 16, 32);
///
/// // Below min_size nothing cuts, whatever the hash.
/// assert_eq!(policy.should_cut(u64::MAX, 3), Cut::No);
/// // At max_size the cut is forced.
/// assert_eq!(policy.should_cut(0, 32), Cut::Forced);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPolicy {
    min_size: usize,
    max_size: usize,
    mask: u64,
}

impl BoundaryPolicy {
    /// Creates a policy for the given size bounds.
    pub fn new(min_size: usize, avg_size: usize, max_size: usize) -> Self {
        let bits = mask_bits(min_size, avg_size, max_size);
        Self {
            min_size,
            max_size,
            mask: u64::MAX << (64 - bits),
        }
    }

    /// Evaluates the position reached after `bytes_since_boundary` bytes of
    /// the current chunk, whose last byte produced `hash`.
    #[inline]
    pub fn should_cut(&self, hash: u64, bytes_since_boundary: usize) -> Cut {
        if bytes_since_boundary < self.min_size {
            return Cut::No;
        }

        if bytes_since_boundary >= self.max_size {
            return Cut::Forced;
        }

        // All mask bits set: an all-zero window hashes to zero and must not
        // look like a boundary.
        if hash & self.mask == self.mask {
            Cut::Content
        } else {
            Cut::No
        }
    }

    /// Returns the boundary mask, `mask_bits` set bits at the top of a `u64`.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Returns the minimum chunk size.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Returns the maximum chunk size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
