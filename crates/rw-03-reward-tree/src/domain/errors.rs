//! # Domain Errors
//!
//! Error types for tree generation.

use rw_01_block_locator::LocatorError;
use shared_types::TransportError;
use std::path::PathBuf;
use thiserror::Error;

/// Reward tree error types.
#[derive(Debug, Error)]
pub enum RewardTreeError {
    /// Reading protocol state failed.
    #[error("Protocol state read failed: {0}")]
    Transport(#[from] TransportError),

    /// The snapshot block could not be located.
    #[error("Snapshot block search failed: {0}")]
    Locator(#[from] LocatorError),

    /// No canonical snapshot event exists for the period yet.
    #[error("Rewards period {index} has not closed yet")]
    PeriodNotClosed {
        /// Period index
        index: u64,
    },

    /// The accounting function failed.
    #[error("Rewards calculation failed: {0}")]
    Calculation(String),

    /// The artifact could not be serialized.
    #[error("Artifact serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compressing the artifact failed.
    #[error("Compression failed: {0}")]
    Compression(#[from] CompressionError),

    /// A local file could not be written.
    #[error("Error saving {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors during compression/decompression.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// Compression failed
    #[error("Compression failed: {0}")]
    CompressFailed(#[source] std::io::Error),

    /// Decompression failed
    #[error("Decompression failed: {0}")]
    DecompressFailed(#[source] std::io::Error),
}
