//! # Local Artifact Store
//!
//! Artifacts on disk under [`RewardsTreePaths`]. Every write goes to a
//! temporary sibling first and is then renamed over the target, so a
//! failed write never leaves a truncated artifact behind.

use shared_types::RewardsTreePaths;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `bytes` to `path` via a temporary file and rename.
pub async fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temporary_path(path);
    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }

    debug!(path = %path.display(), bytes = bytes.len(), "[rw-03] Wrote artifact");
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads and writes artifacts for one network.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    paths: RewardsTreePaths,
}

impl ArtifactStore {
    /// Store rooted at `paths`.
    pub fn new(paths: RewardsTreePaths) -> Self {
        Self { paths }
    }

    /// Path resolver.
    pub fn paths(&self) -> &RewardsTreePaths {
        &self.paths
    }

    /// Whether the JSON artifact for `index` exists locally.
    pub async fn exists(&self, index: u64) -> io::Result<bool> {
        tokio::fs::try_exists(self.paths.tree_path(index)).await
    }

    /// JSON artifact bytes for `index`, `None` if absent.
    pub async fn read(&self, index: u64) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.paths.tree_path(index)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist the JSON artifact and its compressed form.
    ///
    /// The compressed form is written first and the JSON last, so a present
    /// JSON file always has a matching `.zst` beside it. If the JSON write
    /// fails, the just-written `.zst` is removed again.
    ///
    /// On error, returns the path that failed.
    pub async fn write(
        &self,
        index: u64,
        json: &[u8],
        compressed: &[u8],
    ) -> Result<(PathBuf, PathBuf), (PathBuf, io::Error)> {
        let compressed_path = self.paths.compressed_path(index);
        write_atomically(&compressed_path, compressed)
            .await
            .map_err(|e| (compressed_path.clone(), e))?;

        let tree_path = self.paths.tree_path(index);
        if let Err(e) = write_atomically(&tree_path, json).await {
            let _ = tokio::fs::remove_file(&compressed_path).await;
            return Err((tree_path, e));
        }

        Ok((tree_path, compressed_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Network;

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("artifact.json");

        write_atomically(&path, b"old").await.unwrap();
        write_atomically(&path, b"new").await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"new");
        assert!(!temporary_path(&path).exists());
    }

    #[tokio::test]
    async fn test_store_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(RewardsTreePaths::new(dir.path(), Network::Devnet));
        assert!(store.read(3).await.unwrap().is_none());
        assert!(!store.exists(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_write_both_forms() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(RewardsTreePaths::new(dir.path(), Network::Devnet));

        let (json_path, zst_path) = store.write(1, b"{}", b"zz").await.unwrap();
        assert!(json_path.ends_with("rp-rewards-devnet-1.json"));
        assert!(zst_path.ends_with("rp-rewards-devnet-1.json.zst"));
        assert_eq!(store.read(1).await.unwrap().unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_failed_compressed_write_keeps_previous_json() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RewardsTreePaths::new(dir.path(), Network::Devnet);
        let store = ArtifactStore::new(paths.clone());
        store.write(2, b"old", b"old-zst").await.unwrap();

        tokio::fs::remove_file(paths.compressed_path(2)).await.unwrap();
        tokio::fs::create_dir(paths.compressed_path(2)).await.unwrap();

        let (failed, _) = store.write(2, b"new", b"new-zst").await.unwrap_err();
        assert_eq!(failed, paths.compressed_path(2));
        assert_eq!(store.read(2).await.unwrap().unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_failed_json_write_removes_new_compressed_form() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RewardsTreePaths::new(dir.path(), Network::Devnet);
        let store = ArtifactStore::new(paths.clone());
        tokio::fs::create_dir_all(paths.tree_path(4)).await.unwrap();

        let (failed, _) = store.write(4, b"{}", b"zz").await.unwrap_err();
        assert_eq!(failed, paths.tree_path(4));
        assert!(!paths.compressed_path(4).exists());
        assert!(!temporary_path(&paths.tree_path(4)).exists());
    }
}
