//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file
//! 3. `RW_*` environment variables
//!
//! Every loaded configuration goes through [`NodeConfig::validate`] before
//! anything is wired.

use rw_01_block_locator::LocatorConfig;
use rw_03_reward_tree::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS};
use rw_03_reward_tree::TreeConfig;
use rw_05_artifact_distributor::DistributorConfig;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Network, RewardsTreePaths};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Highest zstd level; every operator must compress identically.
pub const MAX_COMPRESSION_LEVEL: i32 = 22;

/// RocketStorage on mainnet.
pub const MAINNET_STORAGE_ADDRESS: &str = "0x1d8f8f00cfa6758d7bE78336684788Fb0ee0Fa46";

/// RocketStorage on Prater.
pub const PRATER_STORAGE_ADDRESS: &str = "0xd8Cd47263414aFEca62d6e2a3917d6600abDceB3";

/// Subdirectory of `data_dir` holding rewards artifacts.
pub const REWARDS_TREES_DIR: &str = "rewards-trees";

/// Complete node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Network the node runs on.
    pub network: Network,
    /// Data directory.
    pub data_dir: PathBuf,
    /// Execution client configuration.
    pub execution: ExecutionConfig,
    /// Protocol contract configuration.
    pub contracts: ContractsConfig,
    /// Rewards tree configuration.
    pub rewards: RewardsConfig,
    /// Artifact download configuration.
    pub distribution: DistributorConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`NodeConfig`].
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range or malformed.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}

/// Execution client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// JSON-RPC endpoint.
    pub url: String,
    /// Deadline for one request, in milliseconds.
    pub request_timeout_ms: u64,
    /// Block span of one `eth_getLogs` query.
    pub event_log_interval: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".to_string(),
            request_timeout_ms: 30_000,
            event_log_interval: 1_000,
        }
    }
}

impl ExecutionConfig {
    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Protocol contract configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Address of the protocol's key/value storage contract; the known
    /// deployment for the network when unset.
    pub storage_address: Option<Address>,
}

/// Known storage contract deployment for `network`.
pub fn known_storage_address(network: Network) -> Option<Address> {
    match network {
        Network::Mainnet => MAINNET_STORAGE_ADDRESS.parse().ok(),
        Network::Prater => PRATER_STORAGE_ADDRESS.parse().ok(),
        Network::Devnet => None,
    }
}

/// Rewards tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// zstd level used for the distributed artifact.
    pub compression_level: i32,
    /// Content-identifier chunk size in bytes.
    pub chunk_size: usize,
    /// Content-identifier DAG fan-out.
    pub max_links_per_node: usize,
    /// Neighbour scan bound of the block locator.
    pub max_correction_steps: u64,
    /// JSON file with snapshot events predating on-chain records.
    pub prehistory_path: Option<PathBuf>,
    /// Seconds between passes downloading missing artifacts.
    pub sync_interval_secs: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            compression_level: MAX_COMPRESSION_LEVEL,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_links_per_node: DEFAULT_MAX_LINKS,
            max_correction_steps: LocatorConfig::default().max_correction_steps,
            prehistory_path: None,
            sync_interval_secs: 300,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            data_dir: PathBuf::from("./data"),
            execution: ExecutionConfig::default(),
            contracts: ContractsConfig::default(),
            rewards: RewardsConfig::default(),
            distribution: DistributorConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Defaults for `network`.
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }

    /// Create a config for testing rooted at `data_dir`.
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            network: Network::Devnet,
            data_dir: data_dir.into(),
            execution: ExecutionConfig {
                request_timeout_ms: 500,
                ..Default::default()
            },
            contracts: ContractsConfig {
                storage_address: Some(Address([0x5a; 20])),
            },
            rewards: RewardsConfig {
                compression_level: 3,
                ..Default::default()
            },
            distribution: DistributorConfig::for_testing(),
        }
    }

    /// Parse TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Apply `RW_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `RW_*` overrides from `lookup`.
    ///
    /// | Variable | Setting |
    /// |----------|---------|
    /// | `RW_NETWORK` | `network` |
    /// | `RW_DATA_DIR` | `data_dir` |
    /// | `RW_EXECUTION_URL` | `execution.url` |
    /// | `RW_REQUEST_TIMEOUT_MS` | `execution.request_timeout_ms` |
    /// | `RW_STORAGE_ADDRESS` | `contracts.storage_address` |
    /// | `RW_PREHISTORY_PATH` | `rewards.prehistory_path` |
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("RW_NETWORK") {
            self.network = value
                .parse()
                .map_err(|e| ConfigError::invalid("RW_NETWORK", format!("{e}")))?;
        }
        if let Some(value) = lookup("RW_DATA_DIR") {
            self.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("RW_EXECUTION_URL") {
            self.execution.url = value;
        }
        if let Some(value) = lookup("RW_REQUEST_TIMEOUT_MS") {
            self.execution.request_timeout_ms = value
                .parse()
                .map_err(|_| ConfigError::invalid("RW_REQUEST_TIMEOUT_MS", value.clone()))?;
        }
        if let Some(value) = lookup("RW_STORAGE_ADDRESS") {
            let address = value
                .parse()
                .map_err(|e| ConfigError::invalid("RW_STORAGE_ADDRESS", format!("{e}")))?;
            self.contracts.storage_address = Some(address);
        }
        if let Some(value) = lookup("RW_PREHISTORY_PATH") {
            self.rewards.prehistory_path = Some(PathBuf::from(value));
        }
        Ok(())
    }

    /// Reject configurations that cannot produce canonical artifacts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.execution.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "execution.url",
                format!("{url} is not an http(s) URL"),
            ));
        }
        if self.execution.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("execution.request_timeout_ms", "must be > 0"));
        }
        if self.execution.event_log_interval == 0 {
            return Err(ConfigError::invalid("execution.event_log_interval", "must be > 0"));
        }
        if self.storage_address().is_none() {
            return Err(ConfigError::invalid(
                "contracts.storage_address",
                format!("no known deployment on {}", self.network),
            ));
        }
        if !(1..=MAX_COMPRESSION_LEVEL).contains(&self.rewards.compression_level) {
            return Err(ConfigError::invalid(
                "rewards.compression_level",
                format!("{} outside 1..={MAX_COMPRESSION_LEVEL}", self.rewards.compression_level),
            ));
        }
        if self.rewards.chunk_size == 0 {
            return Err(ConfigError::invalid("rewards.chunk_size", "must be > 0"));
        }
        if self.rewards.max_links_per_node < 2 {
            return Err(ConfigError::invalid("rewards.max_links_per_node", "must be >= 2"));
        }
        if self.rewards.sync_interval_secs == 0 {
            return Err(ConfigError::invalid("rewards.sync_interval_secs", "must be > 0"));
        }
        if self.distribution.sources.is_empty() {
            return Err(ConfigError::invalid("distribution.sources", "at least one source"));
        }
        Ok(())
    }

    /// Storage contract address, configured or known for the network.
    pub fn storage_address(&self) -> Option<Address> {
        self.contracts
            .storage_address
            .or_else(|| known_storage_address(self.network))
    }

    /// Directory holding rewards artifacts.
    pub fn rewards_tree_dir(&self) -> PathBuf {
        self.data_dir.join(REWARDS_TREES_DIR)
    }

    /// Artifact path resolver.
    pub fn tree_paths(&self) -> RewardsTreePaths {
        RewardsTreePaths::new(self.rewards_tree_dir(), self.network)
    }

    /// Pause between artifact sync passes.
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.rewards.sync_interval_secs)
    }

    /// Block locator settings.
    pub fn locator_config(&self) -> LocatorConfig {
        LocatorConfig {
            request_timeout_ms: self.execution.request_timeout_ms,
            max_correction_steps: self.rewards.max_correction_steps,
        }
    }

    /// Tree builder settings.
    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            compression_level: self.rewards.compression_level,
            chunk_size: self.rewards.chunk_size,
            max_links_per_node: self.rewards.max_links_per_node,
            locator: self.locator_config(),
        }
    }
}
