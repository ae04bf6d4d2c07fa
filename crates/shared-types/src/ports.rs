//! # Protocol-State Ports
//!
//! Read-only views onto the protocol's on-chain state. Adapters live in
//! `node-runtime`; the mocks here back the subsystem tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::entities::{Address, Hash, RewardsEvent, U256};
use crate::errors::TransportError;
use crate::keys;

/// Rewards pool contract state - outbound port.
#[async_trait]
pub trait RewardsPoolReader: Send + Sync {
    /// Index of the period currently accruing rewards.
    async fn current_reward_index(&self) -> Result<u64, TransportError>;

    /// Length of one claim interval.
    async fn claim_interval_time(&self) -> Result<Duration, TransportError>;

    /// Canonical snapshot event for `index`, `None` if it was never emitted.
    async fn rewards_event(&self, index: u64) -> Result<Option<RewardsEvent>, TransportError>;

    /// Block the protocol was deployed at.
    async fn deployment_block(&self) -> Result<u64, TransportError>;

    /// Whether the deployed contracts support Merkle rewards.
    async fn is_upgraded(&self) -> Result<bool, TransportError>;
}

/// Generic 256-bit word storage - outbound port.
#[async_trait]
pub trait StorageReader: Send + Sync {
    /// Read the word stored under `key` (zero when unset).
    async fn get_uint(&self, key: Hash) -> Result<U256, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory rewards pool.
#[derive(Debug)]
pub struct MockRewardsPool {
    events: RwLock<HashMap<u64, RewardsEvent>>,
    current_index: RwLock<u64>,
    /// Claim interval length.
    pub interval: Duration,
    /// Protocol deployment block.
    pub deploy_block: u64,
    /// Whether contracts report as upgraded.
    pub upgraded: bool,
    /// Should return errors?
    pub should_fail: bool,
}

impl Default for MockRewardsPool {
    fn default() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            current_index: RwLock::new(0),
            interval: Duration::from_secs(28 * 24 * 3600),
            deploy_block: 0,
            upgraded: true,
            should_fail: false,
        }
    }
}

impl MockRewardsPool {
    /// Publish an event; the current index advances past it.
    pub fn publish(&self, event: RewardsEvent) {
        let mut current = self.current_index.write();
        *current = (*current).max(event.index + 1);
        self.events.write().insert(event.index, event);
    }

    /// Pool whose every read fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Pool on contracts that predate Merkle rewards.
    pub fn not_upgraded() -> Self {
        Self {
            upgraded: false,
            ..Default::default()
        }
    }

    /// Force the current index.
    pub fn set_current_index(&self, index: u64) {
        *self.current_index.write() = index;
    }

    fn check(&self) -> Result<(), TransportError> {
        if self.should_fail {
            return Err(TransportError::Unreachable {
                endpoint: "mock-rewards-pool".to_string(),
                reason: "Mock failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RewardsPoolReader for MockRewardsPool {
    async fn current_reward_index(&self) -> Result<u64, TransportError> {
        self.check()?;
        Ok(*self.current_index.read())
    }

    async fn claim_interval_time(&self) -> Result<Duration, TransportError> {
        self.check()?;
        Ok(self.interval)
    }

    async fn rewards_event(&self, index: u64) -> Result<Option<RewardsEvent>, TransportError> {
        self.check()?;
        Ok(self.events.read().get(&index).cloned())
    }

    async fn deployment_block(&self) -> Result<u64, TransportError> {
        self.check()?;
        Ok(self.deploy_block)
    }

    async fn is_upgraded(&self) -> Result<bool, TransportError> {
        self.check()?;
        Ok(self.upgraded)
    }
}

/// In-memory word storage that counts reads.
#[derive(Debug, Default)]
pub struct MockStorage {
    words: RwLock<HashMap<Hash, U256>>,
    reads: AtomicUsize,
    /// Should return errors?
    pub should_fail: bool,
}

impl MockStorage {
    /// Storage whose every read fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Store a raw word.
    pub fn set(&self, key: Hash, value: U256) {
        self.words.write().insert(key, value);
    }

    /// Mark `index` as claimed for `account`.
    pub fn set_claimed(&self, account: &Address, index: u64) {
        let key = keys::claimed_bitmap_key(account, index / 256);
        let mut words = self.words.write();
        let word = words.entry(key).or_insert_with(U256::zero);
        *word = *word | (U256::one() << (index % 256) as usize);
    }

    /// Number of `get_uint` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageReader for MockStorage {
    async fn get_uint(&self, key: Hash) -> Result<U256, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(TransportError::Unreachable {
                endpoint: "mock-storage".to_string(),
                reason: "Mock failure".to_string(),
            });
        }
        Ok(self.words.read().get(&key).copied().unwrap_or_default())
    }
}
