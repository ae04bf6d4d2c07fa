//! # Interval Resolver Service
//!
//! Resolves a period's canonical record, then checks the local artifact
//! against it. The resolver never downloads; a missing artifact is only
//! reported.

use async_trait::async_trait;
use rw_03_reward_tree::{leaf_hash, verify_proof, ArtifactStore, RewardsFile};
use shared_types::{Address, RewardsEvent, RewardsPoolReader, RewardsTreePaths};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{prehistory_cutoff, HistoricalEventTable, IntervalInfo, ResolverError};
use crate::ports::IntervalInfoApi;

/// Interval resolver over live protocol state and the local artifact store.
pub struct IntervalResolver {
    pool: Arc<dyn RewardsPoolReader>,
    store: ArtifactStore,
    history: HistoricalEventTable,
}

impl IntervalResolver {
    /// Create a resolver.
    pub fn new(
        pool: Arc<dyn RewardsPoolReader>,
        paths: RewardsTreePaths,
        history: HistoricalEventTable,
    ) -> Self {
        Self {
            pool,
            store: ArtifactStore::new(paths),
            history,
        }
    }

    /// Canonical record for `index`, from the historical table or the protocol.
    pub async fn canonical_event(&self, index: u64) -> Result<RewardsEvent, ResolverError> {
        if index < prehistory_cutoff(self.store.paths().network()) {
            return self
                .history
                .get(index)
                .cloned()
                .ok_or(ResolverError::MissingHistoricalEvent { index });
        }

        self.pool
            .rewards_event(index)
            .await?
            .ok_or(ResolverError::EventNotFound { index })
    }
}

#[async_trait]
impl IntervalInfoApi for IntervalResolver {
    async fn get_interval_info(
        &self,
        account: &Address,
        index: u64,
    ) -> Result<IntervalInfo, ResolverError> {
        let event = self.canonical_event(index).await?;
        let path = self.store.paths().tree_path(index);

        let mut info = IntervalInfo {
            index,
            cid: event.merkle_tree_cid.clone(),
            start_time: event.interval_start_time,
            end_time: event.interval_end_time,
            tree_file_path: path.clone(),
            ..Default::default()
        };

        let bytes = match self.store.read(index).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(index, path = %path.display(), "[rw-04] No local rewards tree");
                return Ok(info);
            }
            Err(source) => return Err(ResolverError::Read { path, source }),
        };
        info.tree_file_exists = true;

        let file = RewardsFile::from_json(&bytes)
            .map_err(|source| ResolverError::Decode { path: path.clone(), source })?;

        if file.merkle_root != event.merkle_root {
            warn!(
                index,
                path = %path.display(),
                "[rw-04] Local rewards tree root does not match the canonical root"
            );
            return Ok(info);
        }
        info.merkle_root_valid = true;

        let Some(rewards) = file.node_rewards.get(account) else {
            return Ok(info);
        };
        info.node_exists = true;
        info.collateral_rpl = rewards.collateral_rpl;
        info.oracle_dao_rpl = rewards.oracle_dao_rpl;
        info.smoothing_pool_eth = rewards.smoothing_pool_eth;

        match rewards.decoded_proof() {
            Ok(proof) if verify_proof(&leaf_hash(account, rewards), &proof, &event.merkle_root) => {
                info.proof_valid = true;
                info.merkle_proof = proof;
            }
            Ok(_) => warn!(
                index,
                node = %account,
                "[rw-04] Merkle proof does not reduce to the canonical root"
            ),
            Err(e) => warn!(
                index,
                node = %account,
                error = %e,
                "[rw-04] Merkle proof could not be decoded"
            ),
        }

        Ok(info)
    }
}
