//! # Prehistoric Periods
//!
//! Early testnet periods have no on-chain snapshot event. Their canonical
//! records come from the historical table while later periods are still
//! read from the protocol.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use rw_03_reward_tree::{build_tree, ArtifactMetadata, NodeRewardInfo, RewardsFile};
    use rw_04_interval_resolver::{
        prehistory_cutoff, HistoricalEventTable, IntervalInfoApi, IntervalResolver, ResolverError,
    };
    use shared_types::encoding::encode_hash;
    use shared_types::{
        Address, Hash, MockRewardsPool, Network, RewardsEvent, RewardsTreePaths, U256,
    };

    fn event(index: u64, merkle_root: Hash) -> RewardsEvent {
        RewardsEvent {
            index,
            execution_block: 7_000_000 + index,
            consensus_block: 3_000_000 + index,
            interval_start_time: index * 100,
            interval_end_time: (index + 1) * 100,
            submission_time: (index + 1) * 100 + 10,
            intervals_passed: 1,
            merkle_root,
            merkle_tree_cid: format!("bafyprater{index}"),
        }
    }

    /// Write a complete artifact for `index` and return its root.
    fn write_artifact(paths: &RewardsTreePaths, index: u64, account: Address) -> Hash {
        let mut nodes = BTreeMap::new();
        nodes.insert(account, NodeRewardInfo::new(U256::from(40), U256::zero(), U256::from(4)));
        nodes.insert(
            Address([0xee; 20]),
            NodeRewardInfo::new(U256::from(1), U256::zero(), U256::zero()),
        );

        let tree = build_tree(&nodes);
        for (address, info) in nodes.iter_mut() {
            info.merkle_proof = tree.proofs[address].iter().map(encode_hash).collect();
        }
        let metadata = ArtifactMetadata {
            index,
            network: Network::Prater,
            ..Default::default()
        };
        let file = RewardsFile::assemble(tree.root, nodes, BTreeMap::new(), metadata);

        std::fs::create_dir_all(paths.directory()).unwrap();
        std::fs::write(paths.tree_path(index), file.to_json().unwrap()).unwrap();
        tree.root
    }

    #[tokio::test]
    async fn test_table_and_protocol_periods_resolve_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RewardsTreePaths::new(dir.path(), Network::Prater);
        let account = Address([0x42; 20]);
        assert_eq!(prehistory_cutoff(Network::Prater), 6);

        let early_root = write_artifact(&paths, 2, account);
        let late_root = write_artifact(&paths, 6, account);

        // The protocol only knows period 6; a stale on-chain record for
        // period 2 must be ignored.
        let pool = Arc::new(MockRewardsPool::default());
        pool.publish(event(2, [0xff; 32]));
        pool.publish(event(6, late_root));

        let history = HistoricalEventTable::from_events([event(2, early_root)]);
        let resolver = IntervalResolver::new(pool, paths, history);

        let early = resolver.get_interval_info(&account, 2).await.unwrap();
        assert_eq!(early.cid, "bafyprater2");
        assert!(early.is_claimable());
        assert_eq!(early.collateral_rpl, U256::from(40));

        let late = resolver.get_interval_info(&account, 6).await.unwrap();
        assert!(late.is_claimable());

        let err = resolver.get_interval_info(&account, 3).await.unwrap_err();
        assert!(matches!(err, ResolverError::MissingHistoricalEvent { index: 3 }));
    }
}
