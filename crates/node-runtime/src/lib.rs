//! # Node Runtime Library
//!
//! Wiring of the rewards subsystems against JSON-RPC and HTTP endpoints,
//! plus the node-facing entry points. The `main.rs` binary drives it.
//!
//! ## Modules
//!
//! - `adapters/` - JSON-RPC execution client and rewards pool reader
//! - `container/` - configuration and subsystem wiring
//! - `api` - generation and claim-status entry points
//! - `executor` - background generation, one task per period

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod api;
pub mod container;
pub mod errors;
pub mod executor;

pub use api::{
    ClaimStatusReport, GenerateAck, GenerationSubmission, HeaderSourceFactory, RewardsApi,
    RewardsPorts,
};
pub use container::{ConfigError, NodeConfig, SubsystemContainer};
pub use errors::RuntimeError;
pub use executor::{ExecutorError, GenerationExecutor, GenerationHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
