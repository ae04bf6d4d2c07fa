//! # Locator Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Block locator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Deadline for a single header fetch, in milliseconds.
    pub request_timeout_ms: u64,

    /// Upper bound on neighbour fetches after the binary search settles.
    pub max_correction_steps: u64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            max_correction_steps: 64,
        }
    }
}

impl LocatorConfig {
    /// Create a config for testing (short deadline).
    pub fn for_testing() -> Self {
        Self {
            request_timeout_ms: 200,
            max_correction_steps: 64,
        }
    }

    /// Per-fetch deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
