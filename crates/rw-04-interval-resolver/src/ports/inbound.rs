//! # Inbound Ports
//!
//! API trait defining what the interval resolver can answer.

use async_trait::async_trait;
use shared_types::Address;

use crate::domain::{IntervalInfo, ResolverError};

/// Interval Resolver API - inbound port.
#[async_trait]
pub trait IntervalInfoApi: Send + Sync {
    /// Entitlement and proof of `account` for period `index`.
    async fn get_interval_info(
        &self,
        account: &Address,
        index: u64,
    ) -> Result<IntervalInfo, ResolverError>;

    /// [`get_interval_info`](Self::get_interval_info) for each index, in order.
    async fn get_intervals_info(
        &self,
        account: &Address,
        indices: &[u64],
    ) -> Result<Vec<IntervalInfo>, ResolverError> {
        let mut infos = Vec::with_capacity(indices.len());
        for &index in indices {
            infos.push(self.get_interval_info(account, index).await?);
        }
        Ok(infos)
    }
}
