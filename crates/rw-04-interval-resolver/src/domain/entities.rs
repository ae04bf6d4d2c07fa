//! # Interval Entities

use serde::{Serialize, Serializer};
use shared_types::encoding::{decimal_u256, encode_hash};
use shared_types::{Hash, U256};
use std::path::PathBuf;

/// What one account is owed for one period, as far as the local artifact
/// can tell.
///
/// Read the flags in order: `tree_file_exists`, then `merkle_root_valid`,
/// then `node_exists`, then `proof_valid`. Later fields are meaningful only
/// when every earlier flag is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalInfo {
    /// Period index.
    pub index: u64,
    /// Content identifier of the canonical artifact.
    pub cid: String,
    /// Unix start of the period.
    pub start_time: u64,
    /// Unix end of the period.
    pub end_time: u64,
    /// Local artifact path.
    pub tree_file_path: PathBuf,
    /// Whether the local artifact exists.
    pub tree_file_exists: bool,
    /// Whether the artifact root equals the canonical root.
    pub merkle_root_valid: bool,
    /// Whether the account appears in the artifact.
    pub node_exists: bool,
    /// Whether the account's proof decodes and replays to the canonical root.
    pub proof_valid: bool,
    /// RPL for staked collateral.
    #[serde(serialize_with = "decimal_u256::serialize")]
    pub collateral_rpl: U256,
    /// RPL for oracle DAO duties.
    #[serde(serialize_with = "decimal_u256::serialize")]
    pub oracle_dao_rpl: U256,
    /// ETH from the smoothing pool.
    #[serde(serialize_with = "decimal_u256::serialize")]
    pub smoothing_pool_eth: U256,
    /// Decoded proof (empty unless `proof_valid`).
    #[serde(serialize_with = "hex_proof")]
    pub merkle_proof: Vec<Hash>,
}

impl IntervalInfo {
    /// Whether the account can claim this period with the returned proof.
    pub fn is_claimable(&self) -> bool {
        self.tree_file_exists && self.merkle_root_valid && self.node_exists && self.proof_valid
    }
}

fn hex_proof<S: Serializer>(proof: &[Hash], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(proof.iter().map(encode_hash))
}
