//! # Generation Entities

use serde::{Deserialize, Serialize};
use shared_types::encoding::hex_hash;
use shared_types::{Address, Hash};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::artifact::{NetworkRewardInfo, NodeRewardInfo};

/// Output of the accounting function for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewardCalculation {
    /// Per-account rewards (proofs empty).
    pub node_rewards: BTreeMap<Address, NodeRewardInfo>,
    /// Per-network totals.
    pub network_rewards: BTreeMap<u64, NetworkRewardInfo>,
    /// Accounts assigned to a network that does not exist.
    pub invalid_node_networks: BTreeMap<Address, u64>,
}

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    /// Period index.
    pub index: u64,
    /// Root of the locally built tree.
    #[serde(with = "hex_hash")]
    pub root: Hash,
    /// Root published on chain.
    #[serde(with = "hex_hash")]
    pub canonical_root: Hash,
    /// Whether the two roots agree (the artifact is claimable).
    pub canonical_root_matches: bool,
    /// Content identifier of the compressed artifact.
    pub cid: String,
    /// Execution block the snapshot was pinned to.
    pub snapshot_block: u64,
    /// Number of accounts in the tree.
    pub node_count: usize,
    /// Where the JSON artifact was written.
    pub path: PathBuf,
    /// Where the compressed artifact was written.
    pub compressed_path: PathBuf,
}
