//! Textual chunk report.
//!
//! The report format is line oriented:
//!
//! ```text
//! 10 kB
//! 3
//! <hex digest of chunk 0>
//! <hex digest of chunk 1>
//! <hex digest of chunk 2>
//! ```
//!
//! The first line is the input size, the second the chunk count, followed
//! by one lowercase hex digest per chunk in stream order.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::chunk::{Chunk, ChunkHash};
use crate::chunker::Chunker;
use crate::config::ChunkConfig;
use crate::error::ChunkError;

const SIZE_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with SI units.
///
/// Values under ten bytes print as is. Larger values are scaled to the
/// biggest unit not exceeding them and rounded to one decimal, which is
/// dropped once the scaled value reaches ten.
///
/// ```
/// use rollcdc::format_size;
///
/// assert_eq!(format_size(7), "7 B");
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1_500), "1.5 kB");
/// assert_eq!(format_size(10_000), "10 kB");
/// assert_eq!(format_size(3_200_000), "3.2 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exp = 0;
    let mut scale = 1u128;
    while exp + 1 < SIZE_UNITS.len() && scale * 1000 <= bytes as u128 {
        scale *= 1000;
        exp += 1;
    }

    // Round half up to one decimal.
    let tenths = (bytes as u128 * 20 + scale) / (scale * 2);
    let unit = SIZE_UNITS[exp];
    if tenths < 100 {
        format!("{}.{} {unit}", tenths / 10, tenths % 10)
    } else {
        format!("{} {unit}", (tenths + 5) / 10)
    }
}

/// Size, chunk count and chunk digests of one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkReport {
    /// Total number of input bytes.
    pub total_size: u64,
    /// Chunks in stream order.
    pub chunks: Vec<Chunk>,
}

impl ChunkReport {
    /// Builds a report from chunks in stream order.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let total_size = chunks.iter().map(|c| c.len() as u64).sum();
        Self { total_size, chunks }
    }

    /// Chunks `reader` to the end and reports on it.
    pub fn from_reader<R: Read>(reader: R, config: ChunkConfig) -> Result<Self, ChunkError> {
        let chunks = Chunker::try_new(config)?
            .chunk(reader)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_chunks(chunks))
    }

    /// Opens and chunks the file at `path`.
    pub fn from_path(path: impl AsRef<Path>, config: ChunkConfig) -> Result<Self, ChunkError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ChunkError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, config)
    }

    /// Returns the chunk digests in stream order.
    pub fn hashes(&self) -> impl Iterator<Item = &ChunkHash> {
        self.chunks.iter().map(|c| &c.hash)
    }

    /// Returns the number of distinct chunk digests.
    pub fn unique_chunks(&self) -> usize {
        self.hashes().collect::<HashSet<_>>().len()
    }

    /// Returns total bytes divided by the bytes left after collapsing
    /// repeated chunks. `1.0` means nothing repeats.
    pub fn dedup_ratio(&self) -> f64 {
        let mut seen = HashSet::new();
        let unique_bytes: u64 = self
            .chunks
            .iter()
            .filter(|c| seen.insert(c.hash))
            .map(|c| c.len() as u64)
            .sum();

        if unique_bytes == 0 {
            return 1.0;
        }
        self.total_size as f64 / unique_bytes as f64
    }
}

impl FromIterator<Chunk> for ChunkReport {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        Self::from_chunks(iter.into_iter().collect())
    }
}

impl fmt::Display for ChunkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", format_size(self.total_size))?;
        writeln!(f, "{}", self.chunks.len())?;
        for hash in self.hashes() {
            writeln!(f, "{hash}")?;
        }
        Ok(())
    }
}
