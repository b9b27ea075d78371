//! Configuration for chunking behavior.
//!
//! This module provides types to configure how chunking is performed:
//!
//! - [`ChunkConfig`] - Window size, chunk size bounds and hashing behavior
//! - [`HashConfig`] - Which digest identifies a chunk
//!
//! Every parameter here changes the resulting chunk boundaries or digests.
//! Two runs with different configurations are not content-compatible, so
//! store [`ChunkConfig`]'s `Display` tag next to any persisted digests.
//!
//! # Example
//!
//! ```
//! use rollcdc::{ChunkConfig, HashAlgorithm, HashConfig};
//!
//! // Custom window and chunk sizes
//! let config = ChunkConfig::new(48, 1024, 4096, 16384)?;
//!
//! // SHA-256 identities instead of BLAKE3
//! let config = ChunkConfig::default()
//!     .with_hash_config(HashConfig::new(HashAlgorithm::Sha256));
//!
//! # Ok::<(), rollcdc::ChunkError>(())
//! ```

use std::fmt;

use crate::cdc::policy::mask_bits;
use crate::error::ChunkError;

/// Default rolling window size (64 bytes).
pub const DEFAULT_WINDOW_SIZE: usize = 64;

/// Default minimum chunk size (512 bytes).
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 512;

/// Default average/target chunk size (2 KiB).
pub const DEFAULT_AVG_CHUNK_SIZE: usize = 2 * 1024;

/// Default maximum chunk size (4 KiB).
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 4 * 1024;

/// Default multiplier of the rolling polynomial hash.
///
/// Must be odd so that multiplication is invertible modulo 2^64.
pub const DEFAULT_POLYNOMIAL: u64 = 0x0000_0100_0000_01b3;

/// Configuration for content-defined chunking behavior.
///
/// - `window_size` - Bytes covered by each rolling-hash evaluation
/// - `min_size` - No content boundary is considered before this many bytes
/// - `avg_size` - Expected chunk size; tunes the boundary probability
/// - `max_size` - A boundary is forced once a chunk reaches this size
///
/// # Size Constraints
///
/// - All values non-zero
/// - `window_size <= min_size < avg_size < max_size`
/// - `polynomial` odd
///
/// # Example
///
/// ```
/// use rollcdc::ChunkConfig;
///
/// let config = ChunkConfig::default();
/// assert_eq!(config.window_size(), 64);
///
/// let config = ChunkConfig::default()
///     .with_min_size(1024)
///     .with_avg_size(8192)
///     .with_max_size(16384);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    /// Rolling window size in bytes.
    window_size: usize,

    /// Minimum chunk size in bytes.
    min_size: usize,

    /// Average/target chunk size in bytes.
    avg_size: usize,

    /// Maximum chunk size in bytes.
    max_size: usize,

    /// Multiplier of the rolling hash.
    polynomial: u64,

    /// Configuration for hashing behavior.
    hash_config: HashConfig,
}

impl ChunkConfig {
    /// Creates a new configuration with the specified window and size bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if:
    /// - Any value is zero
    /// - The sizes are not strictly ordered `min < avg < max`
    /// - `window_size` is larger than `min_size`
    ///
    /// # Example
    ///
    /// ```
    /// use rollcdc::ChunkConfig;
    ///
    /// let config = ChunkConfig::new(64, 512, 2048, 4096)?;
    /// assert_eq!(config.min_size(), 512);
    /// # Ok::<(), rollcdc::ChunkError>(())
    /// ```
    pub fn new(
        window_size: usize,
        min_size: usize,
        avg_size: usize,
        max_size: usize,
    ) -> Result<Self, ChunkError> {
        let config = Self {
            window_size,
            min_size,
            avg_size,
            max_size,
            polynomial: DEFAULT_POLYNOMIAL,
            hash_config: HashConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the rolling window size.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Sets the minimum chunk size.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_min_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self
    }

    /// Sets the average/target chunk size.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_avg_size(mut self, size: usize) -> Self {
        self.avg_size = size;
        self
    }

    /// Sets the maximum chunk size.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Sets the multiplier of the rolling hash.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_polynomial(mut self, polynomial: u64) -> Self {
        self.polynomial = polynomial;
        self
    }

    /// Sets the hash configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use rollcdc::{ChunkConfig, HashAlgorithm, HashConfig};
    ///
    /// let config = ChunkConfig::default()
    ///     .with_hash_config(HashConfig::new(HashAlgorithm::Sha256));
    /// assert_eq!(config.hash_config().algorithm, HashAlgorithm::Sha256);
    /// ```
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash_config = config;
        self
    }

    /// Returns the rolling window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the minimum chunk size.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Returns the average/target chunk size.
    pub fn avg_size(&self) -> usize {
        self.avg_size
    }

    /// Returns the maximum chunk size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the rolling hash multiplier.
    pub fn polynomial(&self) -> u64 {
        self.polynomial
    }

    /// Returns the hash configuration.
    pub fn hash_config(&self) -> &HashConfig {
        &self.hash_config
    }

    /// Number of high hash bits compared against the boundary pattern.
    ///
    /// Chosen so that on random input the expected chunk size, after the
    /// truncation at `max_size`, lands as close to `avg_size` as a whole
    /// number of bits allows.
    pub fn mask_bits(&self) -> u32 {
        mask_bits(self.min_size, self.avg_size, self.max_size)
    }

    /// Validates the current configuration.
    ///
    /// ```
    /// use rollcdc::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_min_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.window_size == 0 || self.min_size == 0 || self.avg_size == 0 || self.max_size == 0
        {
            return Err(ChunkError::InvalidConfig {
                message: "window and chunk sizes must be non-zero",
            });
        }

        if self.min_size >= self.avg_size {
            return Err(ChunkError::InvalidConfig {
                message: "min_size must be less than avg_size",
            });
        }

        if self.avg_size >= self.max_size {
            return Err(ChunkError::InvalidConfig {
                message: "avg_size must be less than max_size",
            });
        }

        if self.window_size > self.min_size {
            return Err(ChunkError::InvalidConfig {
                message: "window_size cannot be greater than min_size",
            });
        }

        if self.polynomial % 2 == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "polynomial must be odd",
            });
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_size: DEFAULT_MIN_CHUNK_SIZE,
            avg_size: DEFAULT_AVG_CHUNK_SIZE,
            max_size: DEFAULT_MAX_CHUNK_SIZE,
            polynomial: DEFAULT_POLYNOMIAL,
            hash_config: HashConfig::default(),
        }
    }
}

/// Parameter tag identifying the chunk identities this configuration yields.
///
/// Formatted as `rk<polynomial hex>-w<window>-<min>-<avg>-<max>-<hash>`.
impl fmt::Display for ChunkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rk{:x}-w{}-{}-{}-{}-{}",
            self.polynomial,
            self.window_size,
            self.min_size,
            self.avg_size,
            self.max_size,
            self.hash_config.algorithm
        )
    }
}

/// Digest algorithm used for chunk identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// BLAKE3, 32-byte output.
    #[default]
    Blake3,
    /// SHA-256, 32-byte output.
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Blake3 => f.write_str("blake3"),
            HashAlgorithm::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Configuration for chunk hashing behavior.
///
/// Every chunk gets a digest; this only selects the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashConfig {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
}

impl HashConfig {
    /// Creates a new hash configuration.
    pub const fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// BLAKE3 identities.
    pub const fn blake3() -> Self {
        Self::new(HashAlgorithm::Blake3)
    }

    /// SHA-256 identities.
    pub const fn sha256() -> Self {
        Self::new(HashAlgorithm::Sha256)
    }
}
