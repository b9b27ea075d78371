//! Rabin-Karp content-defined chunking state.
//!
//! Combines a [`RollingWindow`] with a [`BoundaryPolicy`] and the count of
//! bytes consumed since the last boundary. Feeding bytes one at a time
//! through [`RabinCdc::update`] is the whole algorithm; callers decide
//! what to do with the bytes between boundaries.

use super::policy::{BoundaryPolicy, Cut};
use super::window::RollingWindow;
use crate::config::ChunkConfig;

/// Rolling-hash chunking state for one stream.
///
/// # Determinism
///
/// The decision for a byte depends only on the last `window_size` bytes
/// and the distance to the previous boundary. The same stream therefore
/// produces the same boundaries however it is split into reads.
///
/// # Example
///
/// ```
/// use rollcdc::{ChunkConfig, Cut, RabinCdc};
///
/// let mut cdc = RabinCdc::new(&ChunkConfig::default());
///
/// let cuts: Vec<Cut> = std::iter::repeat(0u8)
///     .take(5000)
///     .map(|byte| cdc.update(byte))
///     .filter(|cut| cut.is_boundary())
///     .collect();
/// assert_eq!(cuts, vec![Cut::Forced]);
/// ```
#[derive(Debug, Clone)]
pub struct RabinCdc {
    window: RollingWindow,
    policy: BoundaryPolicy,

    /// Number of bytes processed since last boundary.
    bytes_since_boundary: usize,
}

impl RabinCdc {
    /// Creates chunking state for the given configuration.
    pub fn new(config: &ChunkConfig) -> Self {
        Self {
            window: RollingWindow::new(config.window_size(), config.polynomial()),
            policy: BoundaryPolicy::new(config.min_size(), config.avg_size(), config.max_size()),
            bytes_since_boundary: 0,
        }
    }

    /// Resets the state for a new stream.
    pub fn reset(&mut self) {
        self.window.reset();
        self.bytes_since_boundary = 0;
    }

    /// Processes a single byte and reports whether it ends a chunk.
    ///
    /// On a boundary the byte counter restarts at zero. The rolling window
    /// is deliberately left untouched so that boundaries after a local edit
    /// fall back in step with the unedited stream.
    #[inline]
    pub fn update(&mut self, byte: u8) -> Cut {
        let hash = self.window.push(byte);
        self.bytes_since_boundary += 1;

        let cut = self.policy.should_cut(hash, self.bytes_since_boundary);
        if cut.is_boundary() {
            self.bytes_since_boundary = 0;
        }
        cut
    }

    /// Processes a buffer and returns the length up to and including the
    /// first boundary, with its kind, or `None` if the whole buffer was
    /// consumed without one.
    pub fn find_boundary(&mut self, data: &[u8]) -> Option<(usize, Cut)> {
        for (i, &byte) in data.iter().enumerate() {
            let cut = self.update(byte);
            if cut.is_boundary() {
                return Some((i + 1, cut));
            }
        }
        None
    }

    /// Returns the number of bytes since the last boundary.
    pub fn bytes_since_boundary(&self) -> usize {
        self.bytes_since_boundary
    }

    /// Returns the current rolling hash value.
    pub fn hash(&self) -> u64 {
        self.window.hash()
    }

    /// Returns the boundary policy.
    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }
}

impl Default for RabinCdc {
    fn default() -> Self {
        Self::new(&ChunkConfig::default())
    }
}
