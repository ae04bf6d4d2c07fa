//! # Runtime Errors

use rw_02_claim_bitmap::ClaimBitmapError;
use rw_04_interval_resolver::ResolverError;
use rw_05_artifact_distributor::DistributorError;
use shared_types::TransportError;
use std::path::PathBuf;
use thiserror::Error;

use crate::container::ConfigError;
use crate::executor::ExecutorError;

/// Errors surfaced by the node runtime's entry points.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A protocol-state read failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Claim bitmap lookup failed.
    #[error(transparent)]
    ClaimBitmap(#[from] ClaimBitmapError),

    /// Interval resolution failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Artifact download failed.
    #[error(transparent)]
    Distributor(#[from] DistributorError),

    /// Generation could not be submitted.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// An HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Local artifact directory access failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
