//! # Domain Layer
//!
//! Claim status entity and errors.

use serde::{Deserialize, Serialize};
use shared_types::TransportError;
use thiserror::Error;

/// Number of periods tracked by one storage word.
pub const PERIODS_PER_WORD: u64 = 256;

/// Claimed and unclaimed periods `0..current_index` for one account.
///
/// Both lists are ascending and together cover every period exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatus {
    /// Periods whose bit is clear.
    pub unclaimed: Vec<u64>,
    /// Periods whose bit is set.
    pub claimed: Vec<u64>,
}

impl ClaimStatus {
    /// Number of periods covered.
    pub fn len(&self) -> usize {
        self.unclaimed.len() + self.claimed.len()
    }

    /// Whether no periods are covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Claim bitmap error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimBitmapError {
    /// Reading a bitmap word (or the current index) failed.
    #[error("Claim bitmap read failed: {0}")]
    Transport(#[from] TransportError),
}
