//! # Reward Tree Configuration

use rw_01_block_locator::LocatorConfig;
use serde::{Deserialize, Serialize};

/// Chunk size used when content-addressing the compressed artifact.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Maximum links per interior DAG node.
pub const DEFAULT_MAX_LINKS: usize = 174;

/// Reward tree builder configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Zstd level for the distributed artifact (1-22).
    pub compression_level: i32,

    /// Chunk size for content addressing, in bytes.
    pub chunk_size: usize,

    /// Fan-out of interior content-addressing nodes.
    pub max_links_per_node: usize,

    /// Snapshot block search settings.
    pub locator: LocatorConfig,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            compression_level: *zstd::compression_level_range().end(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_links_per_node: DEFAULT_MAX_LINKS,
            locator: LocatorConfig::default(),
        }
    }
}

impl TreeConfig {
    /// Create a config for testing (fast compression, short deadlines).
    pub fn for_testing() -> Self {
        Self {
            compression_level: 3,
            locator: LocatorConfig::for_testing(),
            ..Default::default()
        }
    }
}
