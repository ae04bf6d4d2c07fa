//! # Distributor Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::SourceTemplate;

/// Artifact distributor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributorConfig {
    /// Sources, tried in order.
    pub sources: Vec<SourceTemplate>,

    /// Deadline for one download attempt, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            sources: SourceTemplate::defaults(),
            request_timeout_ms: 60_000,
        }
    }
}

impl DistributorConfig {
    /// Create a config for testing (short deadline).
    pub fn for_testing() -> Self {
        Self {
            request_timeout_ms: 500,
            ..Default::default()
        }
    }

    /// Per-attempt deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
