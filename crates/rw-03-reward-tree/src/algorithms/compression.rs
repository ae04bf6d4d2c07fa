//! # Artifact Compression
//!
//! Zstd framing for the distributed form of an artifact.
//!
//! ## Algorithm
//!
//! - **Write Path**: `zstd::encode_all(json, level)` at the configured level
//!   (maximum by default, so every operator derives the same bytes)
//! - **Read Path**: `zstd::decode_all(downloaded)`

use crate::domain::CompressionError;

// =============================================================================
// COMPRESSOR TRAIT
// =============================================================================

/// Trait for artifact compression implementations
pub trait ArtifactCompressor: Send + Sync {
    /// Compress data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
    /// Decompress data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
}

// =============================================================================
// ZSTD COMPRESSOR
// =============================================================================

/// Zstd-based compressor
#[derive(Debug, Clone)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    /// Create a compressor at `level`
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    /// Compressor at the highest level zstd supports
    pub fn best() -> Self {
        Self::new(*zstd::compression_level_range().end())
    }

    /// Configured level
    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::best()
    }
}

impl ArtifactCompressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        zstd::encode_all(data, self.level).map_err(CompressionError::CompressFailed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        zstd::decode_all(data).map_err(CompressionError::DecompressFailed)
    }
}
