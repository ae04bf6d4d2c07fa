//! # Domain Layer
//!
//! Artifact format, generation entities and errors.

pub mod artifact;
pub mod entities;
pub mod errors;

pub use artifact::{
    ArtifactMetadata, NetworkRewardInfo, NodeRewardInfo, RewardsFile, REWARDS_FILE_VERSION,
};
pub use entities::{GenerationReport, RewardCalculation};
pub use errors::{CompressionError, RewardTreeError};
