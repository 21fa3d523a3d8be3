//! File-backed model store.
//!
//! Write-through: `put` serializes the artifact to JSON and atomically
//! replaces the model file, then updates the in-memory cache. Read-through:
//! `get` serves from the cache and falls back to the file, so a freshly
//! restarted process can serve predictions from the last persisted model.

use async_trait::async_trait;
use downwatch_core::{DownwatchError, ModelArtifact, ModelStore, Result};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use crate::atomic_write;

/// Single-slot store persisted at a fixed path.
pub struct FileModelStore {
    path: PathBuf,
    cache: RwLock<Option<ModelArtifact>>,
}

impl FileModelStore {
    /// Create a store persisting to `path`. The file is not touched until
    /// the first `put`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// The on-disk location of the serialized artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_from_disk(&self) -> Result<Option<ModelArtifact>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
                Ok(Some(artifact))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DownwatchError::Storage(format!(
                "Failed to read model file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl ModelStore for FileModelStore {
    async fn put(&self, artifact: ModelArtifact) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&artifact)?;
        // Puts serialize on the cache lock; the file is replaced before
        // the cache is updated.
        let mut slot = self.cache.write().await;
        atomic_write(&self.path, &bytes).await?;
        debug!(path = %self.path.display(), version = %artifact.version, "Model artifact persisted");
        *slot = Some(artifact);
        Ok(())
    }

    async fn get(&self) -> Result<Option<ModelArtifact>> {
        if let Some(artifact) = self.cache.read().await.clone() {
            return Ok(Some(artifact));
        }
        match self.read_from_disk().await? {
            Some(artifact) => {
                debug!(path = %self.path.display(), version = %artifact.version, "Model artifact loaded from disk");
                *self.cache.write().await = Some(artifact.clone());
                Ok(Some(artifact))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use downwatch_core::LogisticModel;

    fn artifact() -> ModelArtifact {
        ModelArtifact::new(
            LogisticModel {
                weights: vec![0.5, -0.25],
                intercept: 1.0,
            },
            vec!["Temperature".to_string(), "Run_Time".to_string()],
        )
    }

    #[tokio::test]
    async fn test_get_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("model.json"));
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_persists_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let store = FileModelStore::new(path.clone());

        let a = artifact();
        store.put(a.clone()).await.unwrap();

        assert!(path.exists());
        let fetched = store.get().await.unwrap().unwrap();
        assert_eq!(fetched.version, a.version);
    }

    #[tokio::test]
    async fn test_restart_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let a = artifact();
        FileModelStore::new(path.clone()).put(a.clone()).await.unwrap();

        // A new store on the same path is a simulated process restart:
        // the cache starts empty and the artifact must come from the file.
        let restarted = FileModelStore::new(path);
        let fetched = restarted.get().await.unwrap().unwrap();
        assert_eq!(fetched.version, a.version);
        assert_eq!(fetched.model, a.model);
    }

    #[tokio::test]
    async fn test_put_overwrites_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let store = FileModelStore::new(path.clone());

        let first = artifact();
        let second = artifact();
        store.put(first).await.unwrap();
        store.put(second.clone()).await.unwrap();

        let restarted = FileModelStore::new(path);
        let fetched = restarted.get().await.unwrap().unwrap();
        assert_eq!(fetched.version, second.version);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileModelStore::new(path);
        assert!(matches!(
            store.get().await,
            Err(DownwatchError::Serialization(_))
        ));
    }
}
