//! # RW-04 Interval Resolver
//!
//! Answers "what is this account owed for period N, and with which proof?"
//! from the local artifact, checked against the canonical on-chain root.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Resolution Order
//!
//! | Step | Outcome |
//! |------|---------|
//! | Period below the network's prehistory cutoff | record from [`HistoricalEventTable`] |
//! | No canonical event | `EventNotFound` error |
//! | No local artifact | `tree_file_exists = false` |
//! | Artifact root differs from canonical | `merkle_root_valid = false` |
//! | Account absent | `node_exists = false` |
//! | Proof does not replay | `proof_valid = false` |
//!
//! ## Module Structure
//!
//! ```text
//! rw-04-interval-resolver/
//! ├── domain/          # IntervalInfo, HistoricalEventTable, errors
//! ├── ports/           # IntervalInfoApi (inbound)
//! └── application/     # IntervalResolver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::IntervalResolver;
pub use domain::{prehistory_cutoff, HistoricalEventTable, IntervalInfo, ResolverError};
pub use ports::IntervalInfoApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
