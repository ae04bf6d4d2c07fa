//! # RW-05 Artifact Distributor
//!
//! Fetches published rewards artifacts for periods this node did not
//! generate itself.
//!
//! **Subsystem ID:** 05
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Sources are tried in a fixed order: content-addressed gateways first
//! (serving the zstd-compressed artifact under its content identifier),
//! then a per-network fallback repository (serving plain JSON). The
//! downloaded content is written as-is; whether it matches the canonical
//! root is decided later by the interval resolver.
//!
//! ## Module Structure
//!
//! ```text
//! rw-05-artifact-distributor/
//! ├── domain/          # SourceTemplate, FetchReport, errors
//! ├── ports/           # HttpFetcher (outbound) + MockHttpFetcher
//! ├── adapters/        # ReqwestFetcher
//! ├── application/     # ArtifactDistributor
//! └── config.rs        # DistributorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::ReqwestFetcher;
pub use application::ArtifactDistributor;
pub use config::DistributorConfig;
pub use domain::{DistributorError, FetchAttempt, FetchReport, SourceKind, SourceTemplate};
pub use ports::{HttpFetcher, HttpResponse, MockHttpFetcher, MockReply};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
