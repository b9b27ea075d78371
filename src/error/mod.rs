//! Error types for rollcdc.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during chunking operations.
///
/// None of these are recovered inside the crate. Every variant aborts the
/// run that produced it; there is no partial-success mode.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The byte source could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        /// Path the caller asked for.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// Reading from the source failed mid-stream.
    #[error("read failed at byte {offset}: {source}")]
    ReadFailure {
        /// Stream offset of the first byte that could not be read.
        offset: u64,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// The replay pass ran out of bytes before the chunk it was asked to
    /// materialize was complete.
    #[error("truncated stream at byte {offset}: expected {expected} bytes, got {actual}")]
    TruncatedStream {
        /// Offset of the chunk being re-read.
        offset: u64,
        /// Chunk length reported by the boundary pass.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl ChunkError {
    /// Wraps an I/O error raised at `offset`.
    pub(crate) fn read(offset: u64, source: io::Error) -> Self {
        ChunkError::ReadFailure { offset, source }
    }

    /// Returns the stream offset the error refers to, if any.
    pub fn offset(&self) -> Option<u64> {
        match self {
            ChunkError::ReadFailure { offset, .. } | ChunkError::TruncatedStream { offset, .. } => {
                Some(*offset)
            }
            _ => None,
        }
    }
}

impl From<io::Error> for ChunkError {
    fn from(e: io::Error) -> Self {
        ChunkError::read(0, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: ChunkError = io_err.into();
        assert!(matches!(err, ChunkError::ReadFailure { offset: 0, .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display_truncated() {
        let err = ChunkError::TruncatedStream {
            offset: 4096,
            expected: 2048,
            actual: 10,
        };
        let s = err.to_string();
        assert!(s.contains("truncated stream"));
        assert!(s.contains("4096"));
        assert_eq!(err.offset(), Some(4096));
    }

    #[test]
    fn test_display_source_unavailable() {
        let err = ChunkError::SourceUnavailable {
            path: PathBuf::from("/no/such/file"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/no/such/file"));
        assert_eq!(err.offset(), None);
    }
}
