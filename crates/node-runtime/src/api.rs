//! # Rewards API
//!
//! The node's entry points for rewards tree generation and claim status.
//!
//! ## Operations
//!
//! | Operation | Returns | Side effect |
//! |-----------|---------|-------------|
//! | `can_generate_rewards_tree` | [`GenerateAck`] | none |
//! | `generate_rewards_tree` | [`GenerationSubmission`] | background generation |
//! | `claim_status` | [`ClaimStatusReport`] | optional artifact downloads |
//! | `sync_missing_trees` | fetch reports | artifact downloads |

use rw_01_block_locator::HeaderSource;
use rw_02_claim_bitmap::ClaimStatusService;
use rw_03_reward_tree::{ArtifactStore, RewardsCalculator, RewardsTreeGenerator, TreeConfig};
use rw_04_interval_resolver::{
    HistoricalEventTable, IntervalInfo, IntervalInfoApi, IntervalResolver,
};
use rw_05_artifact_distributor::{ArtifactDistributor, FetchReport, HttpFetcher};
use serde::Serialize;
use shared_types::{Address, RewardsPoolReader, RewardsTreePaths, StorageReader};
use std::sync::Arc;
use tracing::{info, warn};

use crate::container::NodeConfig;
use crate::errors::RuntimeError;
use crate::executor::{GenerationExecutor, GenerationHandle};

/// Builds a header source for an alternate execution endpoint.
pub type HeaderSourceFactory =
    Arc<dyn Fn(&str) -> Result<Arc<dyn HeaderSource>, RuntimeError> + Send + Sync>;

/// Outbound ports the API is wired with.
#[derive(Clone)]
pub struct RewardsPorts {
    /// Rewards pool state.
    pub pool: Arc<dyn RewardsPoolReader>,
    /// Protocol storage words.
    pub storage: Arc<dyn StorageReader>,
    /// Execution headers of the configured endpoint.
    pub headers: Arc<dyn HeaderSource>,
    /// Header sources for per-request endpoint overrides.
    pub header_factory: HeaderSourceFactory,
    /// The accounting function.
    pub calculator: Arc<dyn RewardsCalculator>,
    /// HTTP access for downloads.
    pub fetcher: Arc<dyn HttpFetcher>,
}

/// Whether a generation can (or did) start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAck {
    /// Merkle rewards are deployed; nothing else is meaningful otherwise.
    pub is_upgraded: bool,
    /// Period currently accruing.
    pub current_index: u64,
    /// A local artifact already exists for the requested index.
    pub tree_file_exists: bool,
}

/// Result of a generation request.
#[derive(Debug)]
pub struct GenerationSubmission {
    /// State observed before submitting.
    pub ack: GenerateAck,
    /// Present when a generation was started.
    pub handle: Option<GenerationHandle>,
}

/// Claim state of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatusReport {
    /// Periods already claimed, ascending.
    pub claimed: Vec<u64>,
    /// Entitlement for each unclaimed period, ascending.
    pub unclaimed: Vec<IntervalInfo>,
    /// Periods whose artifact was downloaded while answering.
    pub downloaded: Vec<u64>,
}

/// Rewards API over live protocol state.
pub struct RewardsApi {
    ports: RewardsPorts,
    paths: RewardsTreePaths,
    tree_config: TreeConfig,
    store: ArtifactStore,
    executor: GenerationExecutor,
    claims: ClaimStatusService,
    resolver: IntervalResolver,
    distributor: ArtifactDistributor,
}

impl RewardsApi {
    /// Wire the API from its ports and configuration.
    pub fn new(ports: RewardsPorts, config: &NodeConfig, history: HistoricalEventTable) -> Self {
        let paths = config.tree_paths();
        Self {
            claims: ClaimStatusService::new(ports.storage.clone(), ports.pool.clone()),
            resolver: IntervalResolver::new(ports.pool.clone(), paths.clone(), history),
            distributor: ArtifactDistributor::new(
                ports.fetcher.clone(),
                paths.clone(),
                config.distribution.clone(),
            ),
            store: ArtifactStore::new(paths.clone()),
            tree_config: config.tree_config(),
            executor: GenerationExecutor::new(),
            paths,
            ports,
        }
    }

    /// Background generation executor.
    pub fn executor(&self) -> &GenerationExecutor {
        &self.executor
    }

    /// Interval resolver.
    pub fn resolver(&self) -> &IntervalResolver {
        &self.resolver
    }

    /// Artifact distributor.
    pub fn distributor(&self) -> &ArtifactDistributor {
        &self.distributor
    }

    /// Report whether `index` can be generated, without starting anything.
    pub async fn can_generate_rewards_tree(&self, index: u64) -> Result<GenerateAck, RuntimeError> {
        let is_upgraded = self.ports.pool.is_upgraded().await?;
        if !is_upgraded {
            return Ok(GenerateAck::default());
        }

        let current_index = self.ports.pool.current_reward_index().await?;
        let tree_file_exists = self.store.exists(index).await.map_err(|source| RuntimeError::Io {
            path: self.paths.tree_path(index),
            source,
        })?;

        Ok(GenerateAck {
            is_upgraded,
            current_index,
            tree_file_exists,
        })
    }

    /// Start generating `index` in the background.
    ///
    /// `execution_url` replaces the configured endpoint for header reads
    /// (e.g. an archive node). Nothing is started when Merkle rewards are
    /// not deployed.
    pub async fn generate_rewards_tree(
        &self,
        index: u64,
        execution_url: Option<&str>,
    ) -> Result<GenerationSubmission, RuntimeError> {
        let ack = self.can_generate_rewards_tree(index).await?;
        if !ack.is_upgraded {
            warn!(index, "[node] Merkle rewards are not deployed; not generating");
            return Ok(GenerationSubmission { ack, handle: None });
        }

        let headers = match execution_url {
            Some(url) => (self.ports.header_factory)(url)?,
            None => self.ports.headers.clone(),
        };
        let generator = RewardsTreeGenerator::new(
            self.ports.pool.clone(),
            headers,
            self.ports.calculator.clone(),
            self.paths.clone(),
            self.tree_config.clone(),
        );

        let handle = self
            .executor
            .submit(index, async move { generator.generate(index).await })?;
        info!(
            index,
            current_index = ack.current_index,
            overwrite = ack.tree_file_exists,
            "[node] Rewards tree generation submitted"
        );

        Ok(GenerationSubmission {
            ack,
            handle: Some(handle),
        })
    }

    /// Claimed periods and per-period entitlement for `account`.
    ///
    /// With `download_missing`, unclaimed periods whose local artifact is
    /// absent or does not match the canonical root are fetched first.
    pub async fn claim_status(
        &self,
        account: &Address,
        download_missing: bool,
    ) -> Result<ClaimStatusReport, RuntimeError> {
        let status = self.claims.claim_status(account).await?;
        let mut unclaimed = self
            .resolver
            .get_intervals_info(account, &status.unclaimed)
            .await?;

        let mut downloaded = Vec::new();
        if download_missing {
            for info in unclaimed.iter_mut() {
                if info.tree_file_exists && info.merkle_root_valid {
                    continue;
                }
                self.distributor.fetch(info.index, &info.cid).await?;
                *info = self.resolver.get_interval_info(account, info.index).await?;
                downloaded.push(info.index);
            }
        }

        Ok(ClaimStatusReport {
            claimed: status.claimed,
            unclaimed,
            downloaded,
        })
    }

    /// Download every closed period that has no local artifact.
    ///
    /// A period whose download fails is logged and skipped.
    pub async fn sync_missing_trees(&self) -> Result<Vec<FetchReport>, RuntimeError> {
        let current_index = self.ports.pool.current_reward_index().await?;
        let mut reports = Vec::new();

        for index in 0..current_index {
            let exists = self.store.exists(index).await.map_err(|source| RuntimeError::Io {
                path: self.paths.tree_path(index),
                source,
            })?;
            if exists {
                continue;
            }

            let event = self.resolver.canonical_event(index).await?;
            match self.distributor.fetch(index, &event.merkle_tree_cid).await {
                Ok(report) => reports.push(report),
                Err(e) => warn!(index, error = %e, "[node] Could not download rewards tree"),
            }
        }

        Ok(reports)
    }
}
