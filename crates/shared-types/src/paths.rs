//! # Artifact Paths
//!
//! Where rewards artifacts live on disk and what they are called remotely.

use std::path::{Path, PathBuf};

use crate::entities::Network;

/// Suffix of the compressed (distributed) form of an artifact.
pub const COMPRESSED_EXTENSION: &str = ".zst";

/// Resolves artifact filenames and paths for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardsTreePaths {
    directory: PathBuf,
    network: Network,
}

impl RewardsTreePaths {
    /// Create a resolver rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>, network: Network) -> Self {
        Self {
            directory: directory.into(),
            network,
        }
    }

    /// Directory holding every artifact.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Network the artifacts belong to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Local filename, e.g. `rp-rewards-mainnet-3.json`.
    pub fn filename(&self, index: u64) -> String {
        format!("rp-rewards-{}-{}.json", self.network, index)
    }

    /// Remote filename of the compressed artifact.
    pub fn compressed_filename(&self, index: u64) -> String {
        format!("{}{}", self.filename(index), COMPRESSED_EXTENSION)
    }

    /// Canonical local path of the artifact for `index`.
    pub fn tree_path(&self, index: u64) -> PathBuf {
        self.directory.join(self.filename(index))
    }

    /// Local path of the compressed artifact for `index`.
    pub fn compressed_path(&self, index: u64) -> PathBuf {
        self.directory.join(self.compressed_filename(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames() {
        let paths = RewardsTreePaths::new("/data/rewards-trees", Network::Prater);
        assert_eq!(paths.filename(4), "rp-rewards-prater-4.json");
        assert_eq!(paths.compressed_filename(4), "rp-rewards-prater-4.json.zst");
        assert_eq!(
            paths.tree_path(4),
            PathBuf::from("/data/rewards-trees/rp-rewards-prater-4.json")
        );
    }
}
