//! # JSON-RPC Rewards Pool
//!
//! [`RewardsPoolReader`] over the protocol contracts. Contract addresses are
//! resolved through the storage contract (`contract.address` + name) and
//! cached for the life of the adapter. Snapshot events are found by scanning
//! `RewardSnapshot` logs from the deployment block in fixed block spans.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::keys::{deploy_block_key, keccak256};
use shared_types::{Address, RewardsEvent, RewardsPoolReader, StorageReader, TransportError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::abi::{self, AbiError, WORD};
use super::json_rpc::JsonRpcExecutionClient;

/// Rewards pool contract name in the storage registry.
pub const REWARDS_POOL_CONTRACT: &str = "rocketRewardsPool";

/// Present only once Merkle rewards are deployed.
pub const MERKLE_DISTRIBUTOR_CONTRACT: &str = "rocketMerkleDistributorMainnet";

/// Canonical signature of the snapshot event.
pub const REWARD_SNAPSHOT_EVENT: &str = "RewardSnapshot(uint256,(uint256,uint256,uint256,bytes32,string,uint256,uint256,uint256[],uint256[],uint256[],uint256),uint256,uint256,uint256)";

/// Rewards pool reader backed by a JSON-RPC execution client.
pub struct JsonRpcRewardsPool {
    client: Arc<JsonRpcExecutionClient>,
    event_log_interval: u64,
    contracts: Mutex<HashMap<&'static str, Address>>,
}

impl JsonRpcRewardsPool {
    /// Create a reader scanning logs `event_log_interval` blocks at a time.
    pub fn new(client: Arc<JsonRpcExecutionClient>, event_log_interval: u64) -> Self {
        Self {
            client,
            event_log_interval: event_log_interval.max(1),
            contracts: Mutex::new(HashMap::new()),
        }
    }

    /// Address registered under `name` in the storage contract.
    pub async fn contract_address(&self, name: &'static str) -> Result<Address, TransportError> {
        let cached = self.contracts.lock().get(name).copied();
        if let Some(address) = cached {
            return Ok(address);
        }
        let key = keccak256(&[b"contract.address", name.as_bytes()]);
        let address = self.client.get_address(key).await?;
        if address != Address::default() {
            self.contracts.lock().insert(name, address);
        }
        Ok(address)
    }

    async fn call_pool_u64(&self, signature: &str) -> Result<u64, TransportError> {
        let pool = self.contract_address(REWARDS_POOL_CONTRACT).await?;
        let output = self
            .client
            .call(&pool, &abi::encode_call(signature, &[]))
            .await?;
        abi::read_u64(&output, 0).map_err(|e| self.client.abi_error(e))
    }
}

#[async_trait]
impl RewardsPoolReader for JsonRpcRewardsPool {
    async fn current_reward_index(&self) -> Result<u64, TransportError> {
        self.call_pool_u64("getRewardIndex()").await
    }

    async fn claim_interval_time(&self) -> Result<Duration, TransportError> {
        self.call_pool_u64("getClaimIntervalTime()")
            .await
            .map(Duration::from_secs)
    }

    async fn rewards_event(&self, index: u64) -> Result<Option<RewardsEvent>, TransportError> {
        if index >= self.current_reward_index().await? {
            return Ok(None);
        }

        let pool = self.contract_address(REWARDS_POOL_CONTRACT).await?;
        let topics = [
            keccak256(&[REWARD_SNAPSHOT_EVENT.as_bytes()]),
            abi::u64_word(index),
        ];
        let head = self.client.block_number().await?;
        let mut from = self.deployment_block().await?;

        while from <= head {
            let to = from.saturating_add(self.event_log_interval - 1).min(head);
            debug!(index, from, to, "[node] Scanning for rewards snapshot event");

            let logs = self.client.get_logs(&pool, &topics, from, to).await?;
            if let Some(log) = logs.first() {
                let data = log.data_bytes().map_err(|reason| TransportError::Decode {
                    endpoint: self.client.url().to_string(),
                    reason,
                })?;
                return decode_reward_snapshot(index, &data)
                    .map(Some)
                    .map_err(|e| self.client.abi_error(e));
            }
            from = to + 1;
        }

        Ok(None)
    }

    async fn deployment_block(&self) -> Result<u64, TransportError> {
        let value = self.client.get_uint(deploy_block_key()).await?;
        if value > shared_types::U256::from(u64::MAX) {
            return Err(self.client.abi_error(AbiError::Overflow { offset: 0 }));
        }
        Ok(value.low_u64())
    }

    async fn is_upgraded(&self) -> Result<bool, TransportError> {
        Ok(self.contract_address(MERKLE_DISTRIBUTOR_CONTRACT).await? != Address::default())
    }
}

/// Decode the non-indexed data of a `RewardSnapshot` log.
///
/// ```text
/// head:   [submission offset] [intervalStartTime] [intervalEndTime] [time]
/// tuple:  rewardIndex executionBlock consensusBlock merkleRoot
///         [cid offset] intervalsPassed ...
/// ```
pub fn decode_reward_snapshot(index: u64, data: &[u8]) -> Result<RewardsEvent, AbiError> {
    let tuple = abi::read_u64(data, 0)? as usize;
    let member = |n: usize| abi::offset(data, tuple, n * WORD);
    let cid_offset = abi::read_u64(data, member(4)?)? as usize;
    let cid = abi::read_dynamic_bytes(data, abi::offset(data, tuple, cid_offset)?)?;

    Ok(RewardsEvent {
        index,
        execution_block: abi::read_u64(data, member(1)?)?,
        consensus_block: abi::read_u64(data, member(2)?)?,
        interval_start_time: abi::read_u64(data, WORD)?,
        interval_end_time: abi::read_u64(data, 2 * WORD)?,
        submission_time: abi::read_u64(data, 3 * WORD)?,
        intervals_passed: abi::read_u64(data, member(5)?)?,
        merkle_root: abi::read_word(data, member(3)?)?,
        merkle_tree_cid: String::from_utf8_lossy(cid).into_owned(),
    })
}
