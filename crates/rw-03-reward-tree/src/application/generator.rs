//! # Rewards Tree Generator
//!
//! Produces the artifact for one closed rewards period.
//!
//! ## Flow
//!
//! 1. Read the period's canonical snapshot event (absent: not closed yet)
//! 2. Pin the execution block nearest the period's end time
//! 3. Run the accounting function at that block
//! 4. Build the tree and compare its root with the canonical one
//! 5. Emit JSON, compress, derive the content identifier
//! 6. Write both forms to disk
//!
//! Any failure before step 6 leaves existing files untouched. A root
//! mismatch is reported but still written: the file is kept for inspection
//! even though it cannot be used for claims.

use rewards_telemetry::metrics::{TREE_GENERATIONS, TREE_GENERATION_SECONDS};
use rw_01_block_locator::{BlockLocator, HeaderSource};
use shared_types::encoding::encode_hash;
use shared_types::{ExecutionHeader, RewardsEvent, RewardsPoolReader, RewardsTreePaths};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::adapters::ArtifactStore;
use crate::algorithms::{
    build_tree, compute_content_identifier, ContentAddresser, UnixFsAddresser, ZstdCompressor,
};
use crate::config::TreeConfig;
use crate::domain::{ArtifactMetadata, GenerationReport, RewardTreeError, RewardsFile};
use crate::ports::RewardsCalculator;

/// Generates rewards artifacts against one execution client.
pub struct RewardsTreeGenerator {
    pool: Arc<dyn RewardsPoolReader>,
    locator: BlockLocator<Arc<dyn HeaderSource>>,
    calculator: Arc<dyn RewardsCalculator>,
    store: ArtifactStore,
    compressor: ZstdCompressor,
    addresser: Arc<dyn ContentAddresser>,
}

impl RewardsTreeGenerator {
    /// Create a generator.
    pub fn new(
        pool: Arc<dyn RewardsPoolReader>,
        headers: Arc<dyn HeaderSource>,
        calculator: Arc<dyn RewardsCalculator>,
        paths: RewardsTreePaths,
        config: TreeConfig,
    ) -> Self {
        Self {
            pool,
            locator: BlockLocator::new(headers, config.locator.clone()),
            calculator,
            store: ArtifactStore::new(paths),
            compressor: ZstdCompressor::new(config.compression_level),
            addresser: Arc::new(UnixFsAddresser::new(
                config.chunk_size,
                config.max_links_per_node,
            )),
        }
    }

    /// Replace the content addresser.
    pub fn with_addresser(mut self, addresser: Arc<dyn ContentAddresser>) -> Self {
        self.addresser = addresser;
        self
    }

    /// Local artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Canonical event for `index` and the execution header nearest its end.
    pub async fn pin_snapshot_block(
        &self,
        index: u64,
    ) -> Result<(RewardsEvent, ExecutionHeader), RewardTreeError> {
        let event = self
            .pool
            .rewards_event(index)
            .await?
            .ok_or(RewardTreeError::PeriodNotClosed { index })?;
        let deploy_block = self.pool.deployment_block().await?;

        let header = self
            .locator
            .find_block_nearest_time(event.interval_end_time, deploy_block)
            .await?;

        Ok((event, header))
    }

    /// Generate and persist the artifact for `index`.
    pub async fn generate(&self, index: u64) -> Result<GenerationReport, RewardTreeError> {
        let _timer = TREE_GENERATION_SECONDS.start_timer();
        let result = self.run(index).await;
        let outcome = if result.is_ok() { "success" } else { "failure" };
        TREE_GENERATIONS.with_label_values(&[outcome]).inc();
        result
    }

    async fn run(&self, index: u64) -> Result<GenerationReport, RewardTreeError> {
        info!(index, "[rw-03] Starting generation of Merkle rewards tree");

        let current_index = self.pool.current_reward_index().await?;
        let interval = self.pool.claim_interval_time().await?;
        info!(
            current_index,
            interval_secs = interval.as_secs(),
            "[rw-03] Protocol state read"
        );

        let (event, snapshot) = self.pin_snapshot_block(index).await?;
        info!(
            index,
            block = snapshot.number,
            timestamp = snapshot.timestamp,
            "[rw-03] Snapshot block pinned"
        );

        info!("[rw-03] Calculating rewards");
        let started = Instant::now();
        let calculation = self.calculator.calculate(&snapshot, interval).await?;
        for (address, network) in &calculation.invalid_node_networks {
            warn!(node = %address, network, "[rw-03] Node has an invalid network assigned");
        }
        info!(
            nodes = calculation.node_rewards.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[rw-03] Rewards calculated"
        );

        let tree = build_tree(&calculation.node_rewards);
        let canonical_root_matches = tree.root == event.merkle_root;
        if canonical_root_matches {
            info!(
                root = %encode_hash(&tree.root),
                "[rw-03] Merkle root matches the canonical root"
            );
        } else {
            warn!(
                root = %encode_hash(&tree.root),
                canonical = %encode_hash(&event.merkle_root),
                "[rw-03] Merkle root differs from the canonical root; this file cannot be used for claiming"
            );
        }

        let mut node_rewards = calculation.node_rewards;
        for (address, info) in node_rewards.iter_mut() {
            if let Some(proof) = tree.proofs.get(address) {
                info.merkle_proof = proof.iter().map(encode_hash).collect();
            }
        }
        let node_count = node_rewards.len();

        let file = RewardsFile::assemble(
            tree.root,
            node_rewards,
            calculation.network_rewards,
            ArtifactMetadata {
                index,
                network: self.store.paths().network(),
                execution_end_block: snapshot.number,
                start_time: event.interval_start_time,
                end_time: event.interval_end_time,
            },
        );
        let json = file.to_json()?;
        let (cid, compressed) =
            compute_content_identifier(&json, &self.compressor, self.addresser.as_ref())?;

        let (path, compressed_path) = self
            .store
            .write(index, &json, &compressed)
            .await
            .map_err(|(path, source)| RewardTreeError::Io { path, source })?;

        info!(
            index,
            cid = %cid,
            path = %path.display(),
            "[rw-03] Merkle tree generation complete"
        );

        Ok(GenerationReport {
            index,
            root: tree.root,
            canonical_root: event.merkle_root,
            canonical_root_matches,
            cid: cid.to_string(),
            snapshot_block: snapshot.number,
            node_count,
            path,
            compressed_path,
        })
    }
}
