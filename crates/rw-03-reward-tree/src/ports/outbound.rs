//! # Outbound Ports
//!
//! The accounting function that turns a snapshot into per-account shares.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::ExecutionHeader;
use std::time::Duration;

use crate::domain::{RewardCalculation, RewardTreeError};

/// Rewards accounting - outbound port.
///
/// Must be a pure function of the snapshot so independent operators derive
/// identical results.
#[async_trait]
pub trait RewardsCalculator: Send + Sync {
    /// Compute every account's rewards at `snapshot` for a period of `interval`.
    async fn calculate(
        &self,
        snapshot: &ExecutionHeader,
        interval: Duration,
    ) -> Result<RewardCalculation, RewardTreeError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock calculator returning a fixed result.
#[derive(Debug, Default)]
pub struct MockRewardsCalculator {
    /// Result returned for every snapshot.
    pub calculation: RewardCalculation,
    /// Should return errors?
    pub should_fail: bool,
    snapshots: Mutex<Vec<u64>>,
}

impl MockRewardsCalculator {
    /// Calculator returning `calculation`.
    pub fn new(calculation: RewardCalculation) -> Self {
        Self {
            calculation,
            ..Default::default()
        }
    }

    /// Calculator that always fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Snapshot block numbers the calculator was invoked with.
    pub fn snapshots(&self) -> Vec<u64> {
        self.snapshots.lock().clone()
    }
}

#[async_trait]
impl RewardsCalculator for MockRewardsCalculator {
    async fn calculate(
        &self,
        snapshot: &ExecutionHeader,
        _interval: Duration,
    ) -> Result<RewardCalculation, RewardTreeError> {
        self.snapshots.lock().push(snapshot.number);
        if self.should_fail {
            return Err(RewardTreeError::Calculation("Mock failure".to_string()));
        }
        Ok(self.calculation.clone())
    }
}
