//! # Outbound Ports
//!
//! Execution-layer header access.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{ExecutionHeader, TransportError};
use std::collections::HashMap;
use std::time::Duration;

/// Execution client header access - outbound port.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    /// Current chain head.
    async fn latest_header(&self) -> Result<ExecutionHeader, TransportError>;

    /// Header at `number`, `None` if the client does not know the block.
    async fn header_by_number(
        &self,
        number: u64,
    ) -> Result<Option<ExecutionHeader>, TransportError>;

    /// Endpoint identifier used in errors and logs.
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: HeaderSource + ?Sized> HeaderSource for std::sync::Arc<T> {
    async fn latest_header(&self) -> Result<ExecutionHeader, TransportError> {
        (**self).latest_header().await
    }

    async fn header_by_number(
        &self,
        number: u64,
    ) -> Result<Option<ExecutionHeader>, TransportError> {
        (**self).header_by_number(number).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock header source: block `n` has timestamp `timestamps[n]`.
#[derive(Debug, Default)]
pub struct MockHeaderSource {
    /// Simulated timestamps indexed by block number; the last one is the head.
    pub timestamps: Vec<u64>,
    /// Artificial latency applied to every call.
    pub delay: Option<Duration>,
    /// Fail when this block is requested.
    pub fail_at: Option<u64>,
    fetches: Mutex<HashMap<u64, usize>>,
}

impl MockHeaderSource {
    /// Build a chain from a timestamp list.
    pub fn with_timestamps(timestamps: Vec<u64>) -> Self {
        Self {
            timestamps,
            ..Default::default()
        }
    }

    /// Build a chain of `len` blocks spaced `spacing` seconds apart from `genesis_time`.
    pub fn regular(len: u64, genesis_time: u64, spacing: u64) -> Self {
        Self::with_timestamps((0..len).map(|n| genesis_time + n * spacing).collect())
    }

    /// Total `header_by_number` calls served.
    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().values().sum()
    }

    /// Highest number of times any single block was fetched.
    pub fn max_fetches_per_block(&self) -> usize {
        self.fetches.lock().values().copied().max().unwrap_or(0)
    }

    fn header(&self, number: u64) -> Option<ExecutionHeader> {
        self.timestamps
            .get(number as usize)
            .map(|ts| ExecutionHeader::new(number, *ts))
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HeaderSource for MockHeaderSource {
    async fn latest_header(&self) -> Result<ExecutionHeader, TransportError> {
        self.simulate_latency().await;
        let head = self.timestamps.len().saturating_sub(1) as u64;
        self.header(head).ok_or_else(|| TransportError::Rpc {
            endpoint: self.endpoint().to_string(),
            message: "empty chain".to_string(),
        })
    }

    async fn header_by_number(
        &self,
        number: u64,
    ) -> Result<Option<ExecutionHeader>, TransportError> {
        *self.fetches.lock().entry(number).or_insert(0) += 1;
        self.simulate_latency().await;
        if self.fail_at == Some(number) {
            return Err(TransportError::Unreachable {
                endpoint: self.endpoint().to_string(),
                reason: "Mock failure".to_string(),
            });
        }
        Ok(self.header(number))
    }

    fn endpoint(&self) -> &str {
        "mock-execution-client"
    }
}
