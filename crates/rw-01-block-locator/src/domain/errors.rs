//! # Domain Errors

use shared_types::TransportError;
use thiserror::Error;

/// Block locator error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// A header fetch failed or timed out. The search is aborted.
    #[error("Header fetch failed: {0}")]
    Transport(#[from] TransportError),

    /// The source reported no header for a block at or below the head.
    #[error("Execution client has no header for block {number}")]
    HeaderMissing {
        /// Block number that was requested
        number: u64,
    },
}

impl LocatorError {
    /// Whether a later search may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        match self {
            LocatorError::Transport(e) => e.is_retryable(),
            LocatorError::HeaderMissing { .. } => false,
        }
    }
}
