//! # Rewards Merkle Tree
//!
//! Binary Keccak-256 tree over per-account reward records.
//!
//! # Algorithm
//!
//! - Leaves are ordered by address bytes.
//! - `leaf = keccak256(address ‖ collateralRpl ‖ oracleDaoRpl ‖ smoothingPoolEth)`
//!   with each amount as a 32-byte big-endian word.
//! - `parent = keccak256(min(a, b) ‖ max(a, b))`, so proofs carry no
//!   left/right positions.
//! - On an odd level the last node moves up unchanged and contributes no
//!   proof element.
//! - An empty tree has the zero root.
//!
//! The odd-level rule must match every other implementation bit for bit;
//! historical roots are the reference.

use shared_types::keys::keccak256;
use shared_types::{Address, Hash, U256, ZERO_HASH};
use std::collections::BTreeMap;

use crate::domain::NodeRewardInfo;

/// Root plus a proof for every account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardsTree {
    /// Tree root.
    pub root: Hash,
    /// Sibling hashes from each account's leaf to the root.
    pub proofs: BTreeMap<Address, Vec<Hash>>,
}

/// Leaf hash for an account's record.
pub fn leaf_hash(address: &Address, info: &NodeRewardInfo) -> Hash {
    keccak256(&[
        address.as_bytes(),
        &word(info.collateral_rpl),
        &word(info.oracle_dao_rpl),
        &word(info.smoothing_pool_eth),
    ])
}

/// Sorted-pair parent hash.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    if a <= b {
        keccak256(&[a, b])
    } else {
        keccak256(&[b, a])
    }
}

/// Build the tree over `node_rewards`.
///
/// Existing `merkle_proof` fields in the input are ignored.
pub fn build_tree(node_rewards: &BTreeMap<Address, NodeRewardInfo>) -> RewardsTree {
    if node_rewards.is_empty() {
        return RewardsTree {
            root: ZERO_HASH,
            proofs: BTreeMap::new(),
        };
    }

    let mut level: Vec<Hash> = node_rewards
        .iter()
        .map(|(address, info)| leaf_hash(address, info))
        .collect();
    let mut proofs: Vec<Vec<Hash>> = vec![Vec::new(); level.len()];
    // Position of each leaf's ancestor within the current level.
    let mut positions: Vec<usize> = (0..level.len()).collect();

    while level.len() > 1 {
        for (proof, position) in proofs.iter_mut().zip(positions.iter_mut()) {
            let sibling = *position ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            *position /= 2;
        }

        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hash_pair(left, right),
                [single] => *single,
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect();
    }

    RewardsTree {
        root: level[0],
        proofs: node_rewards.keys().copied().zip(proofs).collect(),
    }
}

/// Whether `proof` reduces `leaf` to `root`.
pub fn verify_proof(leaf: &Hash, proof: &[Hash], root: &Hash) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |current, sibling| hash_pair(&current, sibling));
    computed == *root
}

fn word(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(n: u64) -> NodeRewardInfo {
        NodeRewardInfo::new(U256::from(n), U256::from(n * 2), U256::from(n * 3))
    }

    fn rewards(count: u8) -> BTreeMap<Address, NodeRewardInfo> {
        (1..=count)
            .map(|i| (Address([i; 20]), record(i as u64)))
            .collect()
    }

    #[test]
    fn test_empty_tree_has_zero_root() {
        let tree = build_tree(&BTreeMap::new());
        assert_eq!(tree.root, ZERO_HASH);
        assert!(tree.proofs.is_empty());
    }

    #[test]
    fn test_single_leaf_is_root() {
        let nodes = rewards(1);
        let tree = build_tree(&nodes);
        let leaf = leaf_hash(&Address([1; 20]), &nodes[&Address([1; 20])]);
        assert_eq!(tree.root, leaf);
        assert!(tree.proofs[&Address([1; 20])].is_empty());
    }

    #[test]
    fn test_two_leaves() {
        let nodes = rewards(2);
        let tree = build_tree(&nodes);
        let a = leaf_hash(&Address([1; 20]), &record(1));
        let b = leaf_hash(&Address([2; 20]), &record(2));
        assert_eq!(tree.root, hash_pair(&a, &b));
        assert_eq!(tree.proofs[&Address([1; 20])], vec![b]);
        assert_eq!(tree.proofs[&Address([2; 20])], vec![a]);
    }

    #[test]
    fn test_odd_leaf_is_promoted() {
        let nodes = rewards(3);
        let tree = build_tree(&nodes);
        let a = leaf_hash(&Address([1; 20]), &record(1));
        let b = leaf_hash(&Address([2; 20]), &record(2));
        let c = leaf_hash(&Address([3; 20]), &record(3));

        assert_eq!(tree.root, hash_pair(&hash_pair(&a, &b), &c));
        // The promoted leaf skips a level, so its proof is one element shorter.
        assert_eq!(tree.proofs[&Address([3; 20])], vec![hash_pair(&a, &b)]);
        assert_eq!(tree.proofs[&Address([1; 20])], vec![b, c]);
    }

    #[test]
    fn test_leaf_encoding() {
        let address = Address([0xEE; 20]);
        let info = NodeRewardInfo::new(U256::from(1), U256::from(2), U256::from(3));
        let mut packed = Vec::new();
        packed.extend_from_slice(&[0xEE; 20]);
        for n in [1u8, 2, 3] {
            let mut w = [0u8; 32];
            w[31] = n;
            packed.extend_from_slice(&w);
        }
        assert_eq!(leaf_hash(&address, &info), keccak256(&[&packed]));
    }

    #[test]
    fn test_existing_proofs_do_not_affect_root() {
        let mut nodes = rewards(5);
        let before = build_tree(&nodes).root;
        for info in nodes.values_mut() {
            info.merkle_proof = vec!["0xdeadbeef".to_string()];
        }
        assert_eq!(build_tree(&nodes).root, before);
    }

    #[test]
    fn test_tampered_amount_fails_verification() {
        let nodes = rewards(4);
        let tree = build_tree(&nodes);
        let address = Address([2; 20]);
        let mut info = nodes[&address].clone();
        info.smoothing_pool_eth += U256::one();
        assert!(!verify_proof(
            &leaf_hash(&address, &info),
            &tree.proofs[&address],
            &tree.root
        ));
    }

    proptest! {
        #[test]
        fn prop_every_proof_verifies(
            entries in prop::collection::btree_map(
                prop::array::uniform20(any::<u8>()),
                (any::<u64>(), any::<u64>(), any::<u64>()),
                1..80,
            )
        ) {
            let nodes: BTreeMap<Address, NodeRewardInfo> = entries
                .into_iter()
                .map(|(bytes, (a, b, c))| {
                    (Address(bytes), NodeRewardInfo::new(a.into(), b.into(), c.into()))
                })
                .collect();

            let tree = build_tree(&nodes);
            prop_assert_eq!(tree.proofs.len(), nodes.len());
            for (address, info) in &nodes {
                let leaf = leaf_hash(address, info);
                prop_assert!(verify_proof(&leaf, &tree.proofs[address], &tree.root));
            }
        }
    }
}
