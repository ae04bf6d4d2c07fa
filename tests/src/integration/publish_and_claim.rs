//! # Publish and Claim
//!
//! One node generates a period's artifact; another downloads it by content
//! identifier and resolves an account's entitlement against the canonical
//! root, as a claimant would.
//!
//! ```text
//! Tree Builder(3) ──artifact + CID──→ Distributor(5) ──→ Resolver(4)
//!       ↑                                                    ↑
//! Block Locator(1)                              Claim Bitmap(2)
//! ```

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use rw_01_block_locator::{HeaderSource, MockHeaderSource};
    use rw_02_claim_bitmap::ClaimStatusService;
    use rw_03_reward_tree::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS};
    use rw_03_reward_tree::{
        build_tree, compute_content_identifier, leaf_hash, verify_proof, MockRewardsCalculator,
        NodeRewardInfo, RewardCalculation, RewardsTreeGenerator, TreeConfig, UnixFsAddresser,
        ZstdCompressor,
    };
    use rw_04_interval_resolver::{HistoricalEventTable, IntervalInfoApi, IntervalResolver};
    use rw_05_artifact_distributor::{
        ArtifactDistributor, DistributorConfig, MockHttpFetcher, MockReply, SourceKind,
    };
    use shared_types::{
        Address, Hash, MockRewardsPool, MockStorage, Network, RewardsEvent, RewardsTreePaths,
        U256,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn account(n: u8) -> Address {
        Address([n; 20])
    }

    /// Five operators with distinct entitlements; an odd count exercises
    /// the promoted last node.
    fn calculation() -> RewardCalculation {
        let node_rewards: BTreeMap<Address, NodeRewardInfo> = (1..=5u8)
            .map(|i| {
                let n = i as u64;
                (
                    account(i),
                    NodeRewardInfo::new(
                        U256::from(n * 1_000),
                        U256::from(n % 2),
                        U256::from(n * 7),
                    ),
                )
            })
            .collect();
        RewardCalculation {
            node_rewards,
            ..Default::default()
        }
    }

    fn event(index: u64, merkle_root: Hash, cid: &str) -> RewardsEvent {
        RewardsEvent {
            index,
            execution_block: 50,
            consensus_block: 60,
            interval_start_time: 1_000,
            interval_end_time: 1_600,
            submission_time: 1_700,
            intervals_passed: 1,
            merkle_root,
            merkle_tree_cid: cid.to_string(),
        }
    }

    fn primary_url(cid: &str, paths: &RewardsTreePaths, index: u64) -> String {
        format!("https://{cid}.ipfs.dweb.link/{}", paths.compressed_filename(index))
    }

    /// Run the publisher side for period 0 and return its report.
    async fn publish(dir: &std::path::Path) -> rw_03_reward_tree::GenerationReport {
        let calc = calculation();
        let root = build_tree(&calc.node_rewards).root;

        let pool = Arc::new(MockRewardsPool::default());
        pool.publish(event(0, root, "pending"));
        let headers: Arc<dyn HeaderSource> = Arc::new(MockHeaderSource::regular(200, 1_000, 12));

        let generator = RewardsTreeGenerator::new(
            pool,
            headers,
            Arc::new(MockRewardsCalculator::new(calc)),
            RewardsTreePaths::new(dir, Network::Devnet),
            TreeConfig::for_testing(),
        );
        generator.generate(0).await.unwrap()
    }

    // =========================================================================
    // INTEGRATION TESTS
    // =========================================================================

    #[tokio::test]
    async fn test_downloaded_artifact_resolves_every_account() {
        let publisher_dir = tempfile::tempdir().unwrap();
        let report = publish(publisher_dir.path()).await;
        assert!(report.canonical_root_matches);
        assert_eq!(report.node_count, 5);
        assert_eq!(report.snapshot_block, 50);

        // Claimant node: same canonical event, announced with the real CID.
        let claimant_dir = tempfile::tempdir().unwrap();
        let paths = RewardsTreePaths::new(claimant_dir.path(), Network::Devnet);
        let pool = Arc::new(MockRewardsPool::default());
        pool.publish(event(0, report.root, &report.cid));

        let fetcher = Arc::new(MockHttpFetcher::new());
        let compressed = std::fs::read(&report.compressed_path).unwrap();
        fetcher.serve(primary_url(&report.cid, &paths, 0), compressed);

        let distributor = ArtifactDistributor::new(
            fetcher.clone(),
            paths.clone(),
            DistributorConfig::for_testing(),
        );
        let fetched = distributor.fetch(0, &report.cid).await.unwrap();
        assert_eq!(fetched.kind, SourceKind::Cid);
        assert!(fetched.failures.is_empty());

        // The claimant holds byte-identical JSON and can re-derive the CID.
        let published = std::fs::read(&report.path).unwrap();
        let downloaded = std::fs::read(paths.tree_path(0)).unwrap();
        assert_eq!(published, downloaded);
        let (cid, _) = compute_content_identifier(
            &downloaded,
            &ZstdCompressor::new(TreeConfig::for_testing().compression_level),
            &UnixFsAddresser::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS),
        )
        .unwrap();
        assert_eq!(cid.to_string(), report.cid);

        let resolver = IntervalResolver::new(pool, paths, HistoricalEventTable::default());
        for i in 1..=5u8 {
            let info = resolver.get_interval_info(&account(i), 0).await.unwrap();
            assert!(info.is_claimable(), "account {i} should be claimable");
            assert_eq!(info.collateral_rpl, U256::from(i as u64 * 1_000));

            let leaf = leaf_hash(
                &account(i),
                &NodeRewardInfo::new(
                    info.collateral_rpl,
                    info.oracle_dao_rpl,
                    info.smoothing_pool_eth,
                ),
            );
            assert!(verify_proof(&leaf, &info.merkle_proof, &report.root));
        }

        let stranger = resolver.get_interval_info(&account(9), 0).await.unwrap();
        assert!(stranger.merkle_root_valid);
        assert!(!stranger.node_exists);
        assert!(!stranger.is_claimable());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_falls_through_to_secondary() {
        let publisher_dir = tempfile::tempdir().unwrap();
        let report = publish(publisher_dir.path()).await;

        let claimant_dir = tempfile::tempdir().unwrap();
        let paths = RewardsTreePaths::new(claimant_dir.path(), Network::Devnet);
        let fetcher = Arc::new(MockHttpFetcher::new());
        fetcher.reply(primary_url(&report.cid, &paths, 0), MockReply::Unreachable);
        fetcher.serve(
            format!("https://ipfs.io/ipfs/{}/{}", report.cid, paths.compressed_filename(0)),
            std::fs::read(&report.compressed_path).unwrap(),
        );

        let distributor = ArtifactDistributor::new(
            fetcher.clone(),
            paths.clone(),
            DistributorConfig::for_testing(),
        );
        let fetched = distributor.fetch(0, &report.cid).await.unwrap();

        assert_eq!(fetched.failures.len(), 1);
        assert_eq!(fetcher.requests().len(), 2);
        assert_eq!(
            std::fs::read(paths.tree_path(0)).unwrap(),
            std::fs::read(&report.path).unwrap()
        );
    }

    #[tokio::test]
    async fn test_claimed_periods_are_excluded_from_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let calc = calculation();
        let root = build_tree(&calc.node_rewards).root;

        let pool = Arc::new(MockRewardsPool::default());
        for index in 0..3 {
            pool.publish(event(index, root, "bafy"));
        }
        let storage = Arc::new(MockStorage::default());
        storage.set_claimed(&account(2), 0);
        storage.set_claimed(&account(2), 2);

        let claims = ClaimStatusService::new(storage, pool.clone());
        let status = claims.claim_status(&account(2)).await.unwrap();
        assert_eq!(status.claimed, vec![0, 2]);
        assert_eq!(status.unclaimed, vec![1]);

        let resolver = IntervalResolver::new(
            pool,
            RewardsTreePaths::new(dir.path(), Network::Devnet),
            HistoricalEventTable::default(),
        );
        let infos = resolver
            .get_intervals_info(&account(2), &status.unclaimed)
            .await
            .unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].index, 1);
        // No artifact downloaded yet.
        assert!(!infos[0].tree_file_exists);
        assert!(!infos[0].is_claimable());
    }
}
