//! # RW-01 Block Locator
//!
//! Finds the execution block whose timestamp is nearest a wall-clock cutoff.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (ports + algorithms)
//!
//! ## Purpose
//!
//! Every operator must pin the *same* snapshot block for a rewards period
//! without coordinating. Block timestamps are only probabilistically
//! monotonic, so the search is a halving binary search by block number
//! followed by a bounded neighbour correction.
//!
//! ## Module Structure
//!
//! ```text
//! rw-01-block-locator/
//! ├── domain/          # LocatorError
//! ├── algorithms/      # find_block_nearest_time
//! ├── ports/           # HeaderSource (outbound) + MockHeaderSource
//! ├── application/     # BlockLocator service
//! └── config.rs        # LocatorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::find_block_nearest_time;
pub use application::BlockLocator;
pub use config::LocatorConfig;
pub use domain::LocatorError;
pub use ports::{HeaderSource, MockHeaderSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
