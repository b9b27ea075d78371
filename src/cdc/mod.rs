//! Content-Defined Chunking (CDC) internals.
//!
//! This module contains the core algorithm for identifying chunk boundaries
//! based on content patterns rather than fixed offsets.
//!
//! - [`RollingWindow`] - Rabin-Karp polynomial hash over the last `w` bytes
//! - [`BoundaryPolicy`] - Min/max bounds and the content match rule
//! - [`RabinCdc`] - Per-stream state driving both, one byte at a time

pub(crate) mod policy;
mod rabin;
mod window;

pub use policy::{BoundaryPolicy, Cut};
pub use rabin::RabinCdc;
pub use window::RollingWindow;
