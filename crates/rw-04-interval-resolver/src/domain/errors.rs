//! # Domain Errors
//!
//! Protocol-state outcomes (missing file, root mismatch, absent account)
//! are flags on [`IntervalInfo`](super::IntervalInfo), not errors.

use shared_types::TransportError;
use std::path::PathBuf;
use thiserror::Error;

/// Interval resolver error types.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Reading protocol state failed.
    #[error("Protocol state read failed: {0}")]
    Transport(#[from] TransportError),

    /// The protocol has no snapshot event for the period.
    #[error("Interval {index} event not found")]
    EventNotFound {
        /// Period index
        index: u64,
    },

    /// A period below the prehistory cutoff is missing from the table.
    #[error("Interval {index} is missing from the historical event table")]
    MissingHistoricalEvent {
        /// Period index
        index: u64,
    },

    /// The local artifact exists but could not be read.
    #[error("Error reading {path}: {source}")]
    Read {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The local artifact is not a valid rewards file.
    #[error("Error deserializing {path}: {source}")]
    Decode {
        /// Artifact path
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// The historical event table could not be loaded.
    #[error("Error loading historical event table {path}: {reason}")]
    HistoricalTable {
        /// Table path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}
