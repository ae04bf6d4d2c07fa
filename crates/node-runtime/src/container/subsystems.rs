//! # Subsystem Container
//!
//! Builds the concrete adapters for one node and hands them to the
//! [`RewardsApi`].
//!
//! ```text
//! JsonRpcExecutionClient ──┬── HeaderSource ──────→ Block Locator
//!                          ├── StorageReader ─────→ Claim Bitmap
//!                          └── JsonRpcRewardsPool → Resolver, Tree Builder
//! ReqwestFetcher ────────────────────────────────→ Artifact Distributor
//! ```

use std::sync::Arc;
use std::time::Duration;

use rw_01_block_locator::HeaderSource;
use rw_03_reward_tree::RewardsCalculator;
use rw_04_interval_resolver::HistoricalEventTable;
use rw_05_artifact_distributor::ReqwestFetcher;
use shared_types::Address;
use tracing::{info, instrument};

use crate::adapters::{JsonRpcExecutionClient, JsonRpcRewardsPool};
use crate::api::{HeaderSourceFactory, RewardsApi, RewardsPorts};
use crate::container::config::{ConfigError, NodeConfig};
use crate::errors::RuntimeError;

/// Owns the wired rewards subsystems of one node.
pub struct SubsystemContainer {
    /// Entry points for generation and claim status.
    pub api: Arc<RewardsApi>,

    /// Shared execution client.
    pub execution: Arc<JsonRpcExecutionClient>,

    /// Node configuration (immutable after initialization).
    pub config: NodeConfig,
}

impl SubsystemContainer {
    /// Wire every subsystem against the endpoints named in `config`.
    ///
    /// `config` must already be validated.
    #[instrument(name = "subsystem_init", skip_all, fields(network = %config.network))]
    pub fn new(
        config: NodeConfig,
        calculator: Arc<dyn RewardsCalculator>,
    ) -> Result<Self, RuntimeError> {
        let storage_address = config.storage_address().ok_or_else(|| {
            RuntimeError::Config(ConfigError::invalid(
                "contracts.storage_address",
                format!("no known deployment on {}", config.network),
            ))
        })?;
        let timeout = config.execution.request_timeout();

        let execution = Arc::new(JsonRpcExecutionClient::new(
            config.execution.url.clone(),
            storage_address,
            timeout,
        )?);
        info!(
            url = %config.execution.url,
            storage = %storage_address,
            "[node] Execution client configured"
        );

        let pool = Arc::new(JsonRpcRewardsPool::new(
            execution.clone(),
            config.execution.event_log_interval,
        ));
        let fetcher = Arc::new(ReqwestFetcher::new(config.distribution.request_timeout())?);

        let header_factory = header_source_factory(storage_address, timeout);
        let history = load_history(&config)?;

        let ports = RewardsPorts {
            pool,
            storage: execution.clone(),
            headers: execution.clone(),
            header_factory,
            calculator,
            fetcher,
        };
        let api = Arc::new(RewardsApi::new(ports, &config, history));
        info!(
            trees = %config.rewards_tree_dir().display(),
            sources = config.distribution.sources.len(),
            "[node] Rewards subsystems initialized"
        );

        Ok(Self {
            api,
            execution,
            config,
        })
    }
}

/// Builds a header source for an operator-supplied execution URL.
fn header_source_factory(storage_address: Address, timeout: Duration) -> HeaderSourceFactory {
    Arc::new(move |url: &str| -> Result<Arc<dyn HeaderSource>, RuntimeError> {
        let client = JsonRpcExecutionClient::new(url, storage_address, timeout)?;
        Ok(Arc::new(client) as Arc<dyn HeaderSource>)
    })
}

/// Historical table from `rewards.prehistory_path`, or the embedded one.
fn load_history(config: &NodeConfig) -> Result<HistoricalEventTable, RuntimeError> {
    let table = match &config.rewards.prehistory_path {
        Some(path) => {
            let table = HistoricalEventTable::load(path)?;
            info!(
                path = %path.display(),
                periods = table.len(),
                "[node] Historical event table loaded"
            );
            table
        }
        None => {
            let table = HistoricalEventTable::bundled(config.network)?;
            if !table.is_empty() {
                info!(periods = table.len(), "[node] Using embedded historical event table");
            }
            table
        }
    };
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_03_reward_tree::MockRewardsCalculator;
    use shared_types::Network;

    #[tokio::test]
    async fn test_container_wires_without_network_access() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig::for_testing(dir.path());
        let container =
            SubsystemContainer::new(config, Arc::new(MockRewardsCalculator::default())).unwrap();

        assert_eq!(container.execution.url(), container.config.execution.url);
        assert!(container.api.executor().in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_missing_prehistory_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::for_testing(dir.path());
        config.rewards.prehistory_path = Some(dir.path().join("missing.json"));

        let result = SubsystemContainer::new(config, Arc::new(MockRewardsCalculator::default()));
        assert!(matches!(result, Err(RuntimeError::Resolver(_))));
    }

    #[test]
    fn test_unset_prehistory_path_uses_embedded_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NodeConfig::for_testing(dir.path());
        config.network = Network::Prater;
        config.rewards.prehistory_path = None;

        let history = load_history(&config).unwrap();
        assert_eq!(history, HistoricalEventTable::bundled(Network::Prater).unwrap());
    }

    #[test]
    fn test_configured_prehistory_path_overrides_embedded_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prehistory.json");
        std::fs::write(&path, "[]").unwrap();
        let mut config = NodeConfig::for_testing(dir.path());
        config.network = Network::Prater;
        config.rewards.prehistory_path = Some(path);

        assert!(load_history(&config).unwrap().is_empty());
    }
}
