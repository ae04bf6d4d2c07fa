//! # RW-03 Reward Tree Builder
//!
//! Builds the Merkle rewards tree for a closed period, packages it as a
//! JSON artifact and derives its content identifier.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Thousands of operators compute the same artifact independently and
//! compare it against the root published on chain. Everything here is
//! deterministic: leaf order, hashing, JSON layout, compression level and
//! chunking.
//!
//! ## Module Structure
//!
//! ```text
//! rw-03-reward-tree/
//! ├── domain/          # RewardsFile, NodeRewardInfo, GenerationReport, errors
//! ├── algorithms/      # Merkle tree, zstd, content identifiers
//! ├── ports/           # RewardsCalculator (outbound) + mock
//! ├── adapters/        # ArtifactStore (local disk, write-then-rename)
//! ├── application/     # RewardsTreeGenerator
//! └── config.rs        # TreeConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{write_atomically, ArtifactStore};
pub use algorithms::{
    build_tree, compute_content_identifier, hash_pair, leaf_hash, verify_proof, ArtifactCompressor,
    Cid, ContentAddresser, RewardsTree, UnixFsAddresser, ZstdCompressor,
};
pub use application::RewardsTreeGenerator;
pub use config::TreeConfig;
pub use domain::{
    ArtifactMetadata, CompressionError, GenerationReport, NetworkRewardInfo, NodeRewardInfo,
    RewardCalculation, RewardTreeError, RewardsFile, REWARDS_FILE_VERSION,
};
pub use ports::{MockRewardsCalculator, RewardsCalculator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
