//! In-memory model store for testing.
//!
//! The artifact is lost when the struct is dropped.

use async_trait::async_trait;
use downwatch_core::{ModelArtifact, ModelStore, Result};
use tokio::sync::RwLock;

/// A single in-memory slot behind an `RwLock`.
#[derive(Default)]
pub struct InMemoryModelStore {
    slot: RwLock<Option<ModelArtifact>>,
}

impl InMemoryModelStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModelStore for InMemoryModelStore {
    async fn put(&self, artifact: ModelArtifact) -> Result<()> {
        *self.slot.write().await = Some(artifact);
        Ok(())
    }

    async fn get(&self) -> Result<Option<ModelArtifact>> {
        Ok(self.slot.read().await.clone())
    }
}
