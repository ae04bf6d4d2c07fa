//! # Generation Executor
//!
//! Runs rewards tree generations in the background, at most one per period
//! index. A submission returns immediately; completion is observed through
//! the returned [`GenerationHandle`].

use parking_lot::Mutex;
use rewards_telemetry::metric_inc;
use rewards_telemetry::metrics::TREE_GENERATIONS;
use rw_03_reward_tree::{GenerationReport, RewardTreeError};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Executor errors.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// A generation for this index is already in flight.
    #[error("rewards tree generation for interval {index} is already running")]
    AlreadyRunning {
        /// Period index.
        index: u64,
    },

    /// The task ended without reporting (panic or runtime shutdown).
    #[error("rewards tree generation for interval {index} was aborted")]
    Aborted {
        /// Period index.
        index: u64,
    },

    /// The generation itself failed.
    #[error(transparent)]
    Failed(#[from] RewardTreeError),
}

/// Releases an index slot when the task ends, however it ends.
struct SlotGuard {
    running: Arc<Mutex<HashSet<u64>>>,
    index: u64,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.running.lock().remove(&self.index);
    }
}

/// Completion of one submitted generation.
#[derive(Debug)]
pub struct GenerationHandle {
    index: u64,
    rx: oneshot::Receiver<Result<GenerationReport, RewardTreeError>>,
}

impl GenerationHandle {
    /// Period index.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Wait for the generation to finish.
    pub async fn wait(self) -> Result<GenerationReport, ExecutorError> {
        match self.rx.await {
            Ok(result) => result.map_err(ExecutorError::from),
            Err(_) => Err(ExecutorError::Aborted { index: self.index }),
        }
    }
}

/// Single-slot-per-index background executor.
#[derive(Debug, Clone, Default)]
pub struct GenerationExecutor {
    running: Arc<Mutex<HashSet<u64>>>,
}

impl GenerationExecutor {
    /// Create an idle executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a generation for `index` is in flight.
    pub fn is_running(&self, index: u64) -> bool {
        self.running.lock().contains(&index)
    }

    /// Indices currently in flight, ascending.
    pub fn in_flight(&self) -> Vec<u64> {
        let mut indices: Vec<u64> = self.running.lock().iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Spawn `task` as the generation for `index`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit<F>(&self, index: u64, task: F) -> Result<GenerationHandle, ExecutorError>
    where
        F: Future<Output = Result<GenerationReport, RewardTreeError>> + Send + 'static,
    {
        if !self.running.lock().insert(index) {
            metric_inc!(TREE_GENERATIONS, &["rejected"]);
            return Err(ExecutorError::AlreadyRunning { index });
        }

        let slot = SlotGuard {
            running: Arc::clone(&self.running),
            index,
        };
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            info!(index, "[node] Starting generation of Merkle rewards tree");
            let result = task.await;
            match &result {
                Ok(report) => info!(
                    index,
                    cid = %report.cid,
                    canonical = report.canonical_root_matches,
                    "[node] Rewards tree generation finished"
                ),
                Err(e) => {
                    error!(index, error = %e, "[node] Rewards tree generation failed");
                    error!("*** Generating rewards tree failed. ***");
                }
            }
            // Free the slot before reporting so a waiter may resubmit at once.
            drop(slot);
            let _ = tx.send(result);
        });

        Ok(GenerationHandle { index, rx })
    }
}
