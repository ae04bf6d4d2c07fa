//! # Rewards Artifact
//!
//! The JSON document every operator produces for a rewards period.
//!
//! ## Layout
//!
//! - `merkleRoot`: root over `nodeRewards`
//! - `nodeRewards`: per-account amounts plus the account's proof
//! - `networkRewards`: per-network totals
//!
//! Metadata fields (`rewardsFileVersion`, `index`, `network`, ...) are
//! optional on read so minimal third-party artifacts still parse. A metadata
//! field of an unexpected shape decodes as its default; the tree itself
//! (`merkleRoot`, `nodeRewards`, `networkRewards`) is always strict.
//! Amounts are base-10 strings. Maps are ordered so serialization is
//! byte-for-byte reproducible.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use shared_types::encoding::{decimal_u256, decode_hash, hex_hash};
use shared_types::{Address, Hash, Network, ParseError, U256};
use std::collections::BTreeMap;

/// Current artifact format version.
pub const REWARDS_FILE_VERSION: u64 = 1;

/// Decode a metadata field, using its default when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Rewards owed to one account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRewardInfo {
    /// RPL for staked collateral.
    #[serde(with = "decimal_u256")]
    pub collateral_rpl: U256,
    /// RPL for oracle DAO duties.
    #[serde(with = "decimal_u256")]
    pub oracle_dao_rpl: U256,
    /// ETH from the smoothing pool.
    #[serde(with = "decimal_u256")]
    pub smoothing_pool_eth: U256,
    /// Sibling hashes from the account's leaf to the root, `0x` hex.
    #[serde(default)]
    pub merkle_proof: Vec<String>,
}

impl NodeRewardInfo {
    /// Record with the given amounts and no proof.
    pub fn new(collateral_rpl: U256, oracle_dao_rpl: U256, smoothing_pool_eth: U256) -> Self {
        Self {
            collateral_rpl,
            oracle_dao_rpl,
            smoothing_pool_eth,
            merkle_proof: Vec::new(),
        }
    }

    /// Decode the stored proof.
    pub fn decoded_proof(&self) -> Result<Vec<Hash>, ParseError> {
        self.merkle_proof.iter().map(|s| decode_hash(s)).collect()
    }
}

/// Rewards attributed to one network, or a grand total.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRewardInfo {
    /// RPL for staked collateral.
    #[serde(with = "decimal_u256")]
    pub collateral_rpl: U256,
    /// RPL for oracle DAO duties.
    #[serde(with = "decimal_u256")]
    pub oracle_dao_rpl: U256,
    /// ETH from the smoothing pool.
    #[serde(with = "decimal_u256")]
    pub smoothing_pool_eth: U256,
}

impl NetworkRewardInfo {
    /// Add another record's amounts to this one.
    pub fn accumulate(&mut self, other: &NetworkRewardInfo) {
        self.collateral_rpl = self.collateral_rpl.saturating_add(other.collateral_rpl);
        self.oracle_dao_rpl = self.oracle_dao_rpl.saturating_add(other.oracle_dao_rpl);
        self.smoothing_pool_eth = self
            .smoothing_pool_eth
            .saturating_add(other.smoothing_pool_eth);
    }
}

/// Period metadata carried alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactMetadata {
    /// Period index.
    pub index: u64,
    /// Network the artifact belongs to.
    pub network: Network,
    /// Snapshot execution block.
    pub execution_end_block: u64,
    /// Unix start of the period.
    pub start_time: u64,
    /// Unix end of the period.
    pub end_time: u64,
}

/// A complete rewards artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsFile {
    /// Format version (0 when absent).
    #[serde(default, deserialize_with = "lenient")]
    pub rewards_file_version: u64,
    /// Period index.
    #[serde(default, deserialize_with = "lenient")]
    pub index: u64,
    /// Network, when recorded.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub network: Option<Network>,
    /// Snapshot execution block.
    #[serde(default, deserialize_with = "lenient")]
    pub execution_end_block: u64,
    /// Unix start of the period.
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: u64,
    /// Unix end of the period.
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: u64,
    /// Root over `node_rewards`.
    #[serde(with = "hex_hash")]
    pub merkle_root: Hash,
    /// Per-account rewards, ordered by address.
    pub node_rewards: BTreeMap<Address, NodeRewardInfo>,
    /// Per-network totals.
    #[serde(default)]
    pub network_rewards: BTreeMap<u64, NetworkRewardInfo>,
    /// Sum of every network's rewards.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_rewards: Option<NetworkRewardInfo>,
}

impl RewardsFile {
    /// Assemble an artifact. `node_rewards` must already carry proofs.
    pub fn assemble(
        merkle_root: Hash,
        node_rewards: BTreeMap<Address, NodeRewardInfo>,
        network_rewards: BTreeMap<u64, NetworkRewardInfo>,
        metadata: ArtifactMetadata,
    ) -> Self {
        let mut total = NetworkRewardInfo::default();
        for info in network_rewards.values() {
            total.accumulate(info);
        }

        Self {
            rewards_file_version: REWARDS_FILE_VERSION,
            index: metadata.index,
            network: Some(metadata.network),
            execution_end_block: metadata.execution_end_block,
            start_time: metadata.start_time,
            end_time: metadata.end_time,
            merkle_root,
            node_rewards,
            network_rewards,
            total_rewards: Some(total),
        }
    }

    /// Parse an artifact from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Whether `merkle_root` equals the root recomputed from `node_rewards`.
    pub fn verify(&self) -> bool {
        crate::algorithms::build_tree(&self.node_rewards).root == self.merkle_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::encoding::encode_hash;

    #[test]
    fn test_minimal_artifact_parses() {
        let json = r#"{
            "merkleRoot": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "nodeRewards": {
                "0x1111111111111111111111111111111111111111": {
                    "collateralRpl": "1000000000000000000",
                    "oracleDaoRpl": "0",
                    "smoothingPoolEth": "5",
                    "merkleProof": []
                }
            },
            "networkRewards": {}
        }"#;

        let file = RewardsFile::from_json(json.as_bytes()).unwrap();
        assert_eq!(file.rewards_file_version, 0);
        assert_eq!(file.network, None);
        let info = &file.node_rewards[&Address([0x11; 20])];
        assert_eq!(info.collateral_rpl, U256::exp10(18));
        assert_eq!(info.smoothing_pool_eth, U256::from(5));
    }

    #[test]
    fn test_amounts_serialize_as_decimal_strings() {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            Address([0xAB; 20]),
            NodeRewardInfo::new(U256::MAX, U256::zero(), U256::from(7)),
        );
        let mut networks = BTreeMap::new();
        networks.insert(
            0,
            NetworkRewardInfo {
                collateral_rpl: U256::from(3),
                ..Default::default()
            },
        );
        let file = RewardsFile::assemble([0; 32], nodes, networks, ArtifactMetadata::default());

        let value: serde_json::Value = serde_json::from_slice(&file.to_json().unwrap()).unwrap();
        let node = &value["nodeRewards"]["0xabababababababababababababababababababab"];
        assert_eq!(node["collateralRpl"], U256::MAX.to_string());
        assert_eq!(node["oracleDaoRpl"], "0");
        assert_eq!(value["networkRewards"]["0"]["collateralRpl"], "3");
        assert_eq!(value["totalRewards"]["collateralRpl"], "3");
        assert_eq!(value["rewardsFileVersion"], 1);
        assert_eq!(value["network"], "mainnet");
    }

    #[test]
    fn test_malformed_root_is_rejected() {
        let json = r#"{"merkleRoot":"0x00","nodeRewards":{}}"#;
        assert!(RewardsFile::from_json(json.as_bytes()).is_err());
    }

    #[test]
    fn test_decoded_proof_rejects_bad_hex() {
        let info = NodeRewardInfo {
            merkle_proof: vec!["0xzz".to_string()],
            ..Default::default()
        };
        assert!(info.decoded_proof().is_err());
    }

    fn full_artifact() -> RewardsFile {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            Address([0x11; 20]),
            NodeRewardInfo::new(U256::MAX, U256::from(1), U256::zero()),
        );
        nodes.insert(
            Address([0x22; 20]),
            NodeRewardInfo::new(U256::exp10(18), U256::zero(), U256::MAX),
        );
        let tree = crate::algorithms::build_tree(&nodes);
        for (address, info) in nodes.iter_mut() {
            info.merkle_proof = tree.proofs[address].iter().map(encode_hash).collect();
        }
        let mut networks = BTreeMap::new();
        networks.insert(
            0,
            NetworkRewardInfo {
                collateral_rpl: U256::MAX,
                oracle_dao_rpl: U256::from(1),
                smoothing_pool_eth: U256::MAX,
            },
        );
        let metadata = ArtifactMetadata {
            index: 9,
            network: Network::Prater,
            execution_end_block: 8_000_123,
            start_time: 1_660_000_000,
            end_time: 1_662_419_200,
        };
        RewardsFile::assemble(tree.root, nodes, networks, metadata)
    }

    #[test]
    fn test_json_roundtrip_preserves_artifact() {
        let file = full_artifact();
        let bytes = file.to_json().unwrap();
        let decoded = RewardsFile::from_json(&bytes).unwrap();

        assert_eq!(decoded, file);
        assert_eq!(decoded.to_json().unwrap(), bytes);
        assert!(decoded.verify());

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let node = &value["nodeRewards"]["0x1111111111111111111111111111111111111111"];
        assert_eq!(
            node["collateralRpl"],
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(node["oracleDaoRpl"], "1");
        assert_eq!(value["network"], "prater");
        assert_eq!(value["startTime"], 1_660_000_000u64);
    }

    #[test]
    fn test_non_canonical_amount_is_rejected() {
        let json = r#"{
            "merkleRoot": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "nodeRewards": {
                "0x1111111111111111111111111111111111111111": {
                    "collateralRpl": "007",
                    "oracleDaoRpl": "0",
                    "smoothingPoolEth": "0"
                }
            }
        }"#;
        assert!(RewardsFile::from_json(json.as_bytes()).is_err());

        let empty = json.replace("\"007\"", "\"\"");
        assert!(RewardsFile::from_json(empty.as_bytes()).is_err());
    }

    #[test]
    fn test_foreign_metadata_shapes_fall_back_to_defaults() {
        let json = r#"{
            "rewardsFileVersion": "v3",
            "index": 4,
            "network": "holesky",
            "startTime": "2022-08-09T00:00:00Z",
            "endTime": 1662419200,
            "merkleRoot": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "nodeRewards": {},
            "networkRewards": {},
            "totalRewards": {"totalCollateralRpl": "5", "totalOracleDaoRpl": "0"}
        }"#;

        let file = RewardsFile::from_json(json.as_bytes()).unwrap();
        assert_eq!(file.rewards_file_version, 0);
        assert_eq!(file.index, 4);
        assert_eq!(file.network, None);
        assert_eq!(file.start_time, 0);
        assert_eq!(file.end_time, 1_662_419_200);
        assert_eq!(file.total_rewards, None);
    }
}
