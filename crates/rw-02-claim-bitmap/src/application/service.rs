//! # Claim Status Service
//!
//! Reads the current period index from the rewards pool, then scans the
//! account's bitmap.

use rewards_telemetry::metrics::CLAIM_STATUS_QUERIES;
use shared_types::{Address, RewardsPoolReader, StorageReader};
use std::sync::Arc;

use crate::algorithms::{get_claim_status, is_claimed};
use crate::domain::{ClaimBitmapError, ClaimStatus};

/// Claim status over live protocol state.
#[derive(Clone)]
pub struct ClaimStatusService {
    storage: Arc<dyn StorageReader>,
    pool: Arc<dyn RewardsPoolReader>,
}

impl ClaimStatusService {
    /// Create a service.
    pub fn new(storage: Arc<dyn StorageReader>, pool: Arc<dyn RewardsPoolReader>) -> Self {
        Self { storage, pool }
    }

    /// Claimed and unclaimed periods below the current index.
    pub async fn claim_status(&self, account: &Address) -> Result<ClaimStatus, ClaimBitmapError> {
        CLAIM_STATUS_QUERIES.inc();
        let current_index = self.pool.current_reward_index().await?;
        get_claim_status(account, current_index, self.storage.as_ref()).await
    }

    /// Whether `account` has claimed period `index`.
    pub async fn is_claimed(
        &self,
        account: &Address,
        index: u64,
    ) -> Result<bool, ClaimBitmapError> {
        is_claimed(account, index, self.storage.as_ref()).await
    }
}
