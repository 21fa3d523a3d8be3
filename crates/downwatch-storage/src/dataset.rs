//! The uploaded-dataset sink.
//!
//! The upload endpoint persists the raw CSV bytes verbatim to a fixed
//! path, silently overwriting any previous upload. Content is not
//! inspected here; schema checking happens at training time.

use downwatch_core::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::atomic_write;

/// Fixed-path sink for uploaded CSV data.
#[derive(Debug, Clone)]
pub struct DatasetSink {
    path: PathBuf,
    /// Serializes concurrent uploads; clones share the same guard.
    write_guard: Arc<Mutex<()>>,
}

impl DatasetSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Where the trainer will read the dataset from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist an upload, replacing any previous one atomically.
    pub async fn save(&self, bytes: &[u8]) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        atomic_write(&self.path, bytes).await
    }
}
