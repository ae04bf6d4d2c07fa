//! # Distributor Errors

use std::path::PathBuf;
use thiserror::Error;

use super::report::FetchAttempt;

/// Errors raised while fetching an artifact.
#[derive(Debug, Error)]
pub enum DistributorError {
    /// Every source failed; the local file was left untouched.
    #[error("downloading rewards tree {index} failed from every source:\n{}", list_attempts(.attempts))]
    AllSourcesFailed {
        /// Period index.
        index: u64,
        /// Every attempt, in source order.
        attempts: Vec<FetchAttempt>,
    },

    /// The downloaded artifact could not be written.
    #[error("failed to write rewards tree to {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No download sources are configured.
    #[error("no download sources configured")]
    NoSources,
}

fn list_attempts(attempts: &[FetchAttempt]) -> String {
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
