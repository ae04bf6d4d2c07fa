//! # Shared Types Crate
//!
//! Domain entities, storage keys, artifact paths and protocol-state ports
//! used across the rewards subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-subsystem type is defined here.
//! - **Read-only chain state**: ports only ever read from the protocol.
//! - **Decimal amounts**: reward amounts never pass through floating point.

pub mod encoding;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod paths;
pub mod ports;

pub use entities::*;
pub use errors::*;
pub use paths::RewardsTreePaths;
pub use ports::{MockRewardsPool, MockStorage, RewardsPoolReader, StorageReader};
