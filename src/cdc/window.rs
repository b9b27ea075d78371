//! Rolling polynomial hash over a fixed-size byte window.
//!
//! The hash of the window `x[t-w+1] .. x[t]` is
//!
//! ```text
//! H(t) = x[t-w+1] * B^(w-1) + ... + x[t-1] * B + x[t]    (mod 2^64)
//! ```
//!
//! Sliding by one byte multiplies by `B`, adds the incoming byte and
//! subtracts `x[t-w+1] * B^w`. That last term only depends on the leaving
//! byte's value, so it is looked up in a 256-entry table built once per
//! window, making every update O(1) regardless of the window size.

/// A sliding window of the most recent bytes and their polynomial hash.
///
/// The hash always equals the polynomial hash of exactly the last
/// `window_size` bytes pushed (or of all bytes pushed, before the window
/// has filled). Arithmetic wraps; the hash is a fixed-width `u64`.
///
/// # Example
///
/// ```
/// use rollcdc::RollingWindow;
///
/// let mut a = RollingWindow::new(4, 31);
/// let mut b = RollingWindow::new(4, 31);
///
/// for &byte in b"xxxxabcd" {
///     a.push(byte);
/// }
/// for &byte in b"abcd" {
///     b.push(byte);
/// }
///
/// // Only the last four bytes matter once the window is full.
/// assert_eq!(a.hash(), b.hash());
/// ```
#[derive(Debug, Clone)]
pub struct RollingWindow {
    /// `out_table[b] = b * B^window_size`, the contribution to remove when
    /// byte value `b` leaves the trailing edge.
    out_table: Box<[u64; 256]>,

    /// Ring of the last `window_size` bytes.
    ring: Box<[u8]>,

    /// Next write position in `ring`.
    pos: usize,

    /// Whether `ring` holds `window_size` real bytes.
    full: bool,

    polynomial: u64,
    hash: u64,
}

impl RollingWindow {
    /// Creates an empty window of `window_size` bytes using `polynomial`
    /// as the hash multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero. [`crate::ChunkConfig::validate`]
    /// rejects such configurations before a window is ever built.
    pub fn new(window_size: usize, polynomial: u64) -> Self {
        assert!(window_size > 0, "window_size must be non-zero");

        let mut pow = 1u64;
        for _ in 0..window_size {
            pow = pow.wrapping_mul(polynomial);
        }

        let mut out_table = Box::new([0u64; 256]);
        for (b, entry) in out_table.iter_mut().enumerate() {
            *entry = (b as u64).wrapping_mul(pow);
        }

        Self {
            out_table,
            ring: vec![0u8; window_size].into_boxed_slice(),
            pos: 0,
            full: false,
            polynomial,
            hash: 0,
        }
    }

    /// Slides the window forward by one byte and returns the new hash.
    #[inline]
    pub fn push(&mut self, byte: u8) -> u64 {
        let leaving = if self.full {
            self.out_table[self.ring[self.pos] as usize]
        } else {
            0
        };

        self.hash = self
            .hash
            .wrapping_mul(self.polynomial)
            .wrapping_add(byte as u64)
            .wrapping_sub(leaving);

        self.ring[self.pos] = byte;
        self.pos += 1;
        if self.pos == self.ring.len() {
            self.pos = 0;
            self.full = true;
        }

        self.hash
    }

    /// Returns the current hash value.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Returns true once `window_size` bytes have been pushed.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Returns the window size in bytes.
    pub fn window_size(&self) -> usize {
        self.ring.len()
    }

    /// Empties the window. The removal table is kept.
    pub fn reset(&mut self) {
        self.ring.fill(0);
        self.pos = 0;
        self.full = false;
        self.hash = 0;
    }
}
