//! # Merkle Rewards Node
//!
//! Keeps the local rewards tree directory in step with the protocol and
//! answers claim-status queries.
//!
//! ## Usage
//!
//! ```text
//! node-runtime [--config <file>] [run]
//! node-runtime [--config <file>] status <ADDRESS>
//! node-runtime [--config <file>] generate <INDEX> [EXECUTION_URL]
//! ```
//!
//! The config file may also be named by `RW_CONFIG`. `RW_*` variables
//! override individual keys (see `NodeConfig::apply_env`).
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load, override and validate configuration
//! 3. Wire subsystems against the configured endpoints
//! 4. Run the requested command

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use rewards_telemetry::{init_logging, TelemetryConfig};
use shared_types::{Address, ExecutionHeader};
use tracing::{error, info, warn};

use node_runtime::{NodeConfig, SubsystemContainer, VERSION};
use rw_03_reward_tree::{RewardCalculation, RewardTreeError, RewardsCalculator};

/// Calculator used when no accounting function is linked into the binary.
///
/// Generation always fails with a clear message; downloads and claim
/// status work without it.
struct UnlinkedCalculator;

#[async_trait]
impl RewardsCalculator for UnlinkedCalculator {
    async fn calculate(
        &self,
        snapshot: &ExecutionHeader,
        _interval: Duration,
    ) -> Result<RewardCalculation, RewardTreeError> {
        Err(RewardTreeError::Calculation(format!(
            "no accounting function is linked into this build (snapshot block {})",
            snapshot.number
        )))
    }
}

/// Merkle rewards node.
#[derive(Parser, Debug)]
#[command(name = "node-runtime", version)]
#[command(about = "Keeps local rewards trees in sync and reports claim status")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "RW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Sync missing rewards trees until interrupted (default)
    Run,

    /// Print the claim status of an account as JSON
    Status {
        /// Account address, `0x` hex
        address: Address,
    },

    /// Build the rewards tree for a closed period
    Generate {
        /// Period index
        index: u64,

        /// Archive execution endpoint for the snapshot block
        execution_url: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<NodeConfig> {
    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "[node] Loading configuration");
            NodeConfig::from_toml_file(path)?
        }
        None => NodeConfig::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// The running node: periodic artifact sync until shutdown.
struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl NodeRuntime {
    fn new(container: SubsystemContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
        }
    }

    fn start_sync_loop(&self) -> tokio::task::JoinHandle<()> {
        let api = self.container.api.clone();
        let period = self.container.config.sync_interval();
        let mut shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match api.sync_missing_trees().await {
                            Ok(reports) if reports.is_empty() => {}
                            Ok(reports) => info!(
                                downloaded = reports.len(),
                                "[node] Rewards trees synchronized"
                            ),
                            Err(e) => warn!(error = %e, "[node] Rewards tree sync failed"),
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("[node] Sync loop shutting down");
                        break;
                    }
                }
            }
        })
    }

    fn shutdown(&self) {
        info!("[node] Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("[node] Failed to send shutdown signal: {}", e);
        }
    }
}

async fn run(container: SubsystemContainer) -> Result<()> {
    let runtime = NodeRuntime::new(container);
    let sync = runtime.start_sync_loop();

    info!("[node] Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown();
    sync.await?;
    Ok(())
}

async fn status(container: SubsystemContainer, account: Address) -> Result<()> {
    let report = container.api.claim_status(&account, true).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn generate(
    container: SubsystemContainer,
    index: u64,
    execution_url: Option<String>,
) -> Result<()> {
    let submission = container
        .api
        .generate_rewards_tree(index, execution_url.as_deref())
        .await?;
    println!("{}", serde_json::to_string_pretty(&submission.ack)?);

    let Some(handle) = submission.handle else {
        bail!("Merkle rewards are not deployed on {}", container.config.network);
    };
    let report = handle.wait().await?;
    info!(
        index,
        cid = %report.cid,
        canonical = report.canonical_root_matches,
        path = %report.path.display(),
        "[node] Rewards tree written"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry)?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    info!(
        version = VERSION,
        network = %config.network,
        data_dir = %config.data_dir.display(),
        "[node] Merkle rewards node starting"
    );

    let container = SubsystemContainer::new(config, Arc::new(UnlinkedCalculator))?;
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(container).await,
        Command::Status { address } => status(container, address).await,
        Command::Generate {
            index,
            execution_url,
        } => generate(container, index, execution_url).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["node-runtime", "--config", "node.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("node.toml")));
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["node-runtime", "run"]).unwrap();
        assert_eq!(cli.command, Some(Command::Run));
    }

    #[test]
    fn test_status_parses_address() {
        let cli = Cli::try_parse_from([
            "node-runtime",
            "-c",
            "node.toml",
            "status",
            "0x1111111111111111111111111111111111111111",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Status {
                address: Address([0x11; 20])
            })
        );
    }

    #[test]
    fn test_generate_takes_optional_execution_url() {
        let cli = Cli::try_parse_from(["node-runtime", "generate", "12"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Generate {
                index: 12,
                execution_url: None
            })
        );

        let cli =
            Cli::try_parse_from(["node-runtime", "generate", "12", "http://archive:8545"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Generate {
                index: 12,
                execution_url: Some("http://archive:8545".to_string())
            })
        );
    }

    #[test]
    fn test_malformed_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["node-runtime", "status", "0x1234"]).is_err());
        assert!(Cli::try_parse_from(["node-runtime", "generate", "-1"]).is_err());
        assert!(Cli::try_parse_from(["node-runtime", "publish"]).is_err());
        assert!(Cli::try_parse_from(["node-runtime", "--config"]).is_err());
    }
}
