//! # Artifact Distributor Service
//!
//! Downloads a period's artifact from an ordered source list. The first
//! source that answers 2xx with a usable body wins. A source that fails is
//! logged and skipped.
//!
//! ## Flow
//!
//! ```text
//! for source in sources:
//!     url  = render(source)
//!     body = GET url               (per-attempt deadline)
//!     body = zstd -d body          (content-addressed sources only)
//!     write body -> tree_path      (temp file + rename)
//! ```

use rewards_telemetry::metrics::ARTIFACT_DOWNLOADS;
use rw_03_reward_tree::{write_atomically, ArtifactCompressor, ZstdCompressor};
use shared_types::RewardsTreePaths;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DistributorConfig;
use crate::domain::{DistributorError, FetchAttempt, FetchReport, SourceTemplate};
use crate::ports::HttpFetcher;

/// Fetches rewards artifacts into the local artifact directory.
pub struct ArtifactDistributor {
    fetcher: Arc<dyn HttpFetcher>,
    paths: RewardsTreePaths,
    config: DistributorConfig,
    compressor: ZstdCompressor,
}

impl ArtifactDistributor {
    /// Create a distributor.
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        paths: RewardsTreePaths,
        config: DistributorConfig,
    ) -> Self {
        Self {
            fetcher,
            paths,
            config,
            compressor: ZstdCompressor::default(),
        }
    }

    /// Configured sources, in order.
    pub fn sources(&self) -> &[SourceTemplate] {
        &self.config.sources
    }

    /// Download the artifact for `index`, published under `cid`, and write
    /// it over any existing local copy.
    pub async fn fetch(&self, index: u64, cid: &str) -> Result<FetchReport, DistributorError> {
        if self.config.sources.is_empty() {
            return Err(DistributorError::NoSources);
        }

        let filename = self.paths.filename(index);
        let compressed_filename = self.paths.compressed_filename(index);
        let path = self.paths.tree_path(index);
        let mut failures = Vec::new();

        for source in &self.config.sources {
            let url = source.render(cid, &filename, &compressed_filename, self.paths.network());

            match self.attempt(source, &url).await {
                Ok(bytes) => {
                    write_atomically(&path, &bytes)
                        .await
                        .map_err(|e| DistributorError::Write {
                            path: path.clone(),
                            source: e,
                        })?;
                    ARTIFACT_DOWNLOADS
                        .with_label_values(&[source.kind.as_str(), "success"])
                        .inc();
                    info!(
                        index,
                        url = %url,
                        path = %path.display(),
                        skipped = failures.len(),
                        "[rw-05] Downloaded rewards tree"
                    );
                    return Ok(FetchReport {
                        index,
                        path,
                        url,
                        kind: source.kind,
                        failures,
                    });
                }
                Err(reason) => {
                    ARTIFACT_DOWNLOADS
                        .with_label_values(&[source.kind.as_str(), "failure"])
                        .inc();
                    let attempt = FetchAttempt {
                        url,
                        kind: source.kind,
                        reason,
                    };
                    warn!(index, kind = %source.kind, "[rw-05] {attempt}");
                    failures.push(attempt);
                }
            }
        }

        Err(DistributorError::AllSourcesFailed {
            index,
            attempts: failures,
        })
    }

    async fn attempt(&self, source: &SourceTemplate, url: &str) -> Result<Vec<u8>, String> {
        let timeout = self.config.request_timeout();
        let response = tokio::time::timeout(timeout, self.fetcher.get(url))
            .await
            .map_err(|_| format!("timed out after {}ms", timeout.as_millis()))?
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("failed with status {}", response.status));
        }

        if source.kind.is_compressed() {
            self.compressor
                .decompress(&response.body)
                .map_err(|e| format!("Error decompressing: {e}"))
        } else {
            Ok(response.body)
        }
    }
}
