//! Persistence backends for downwatch.
//!
//! Two implementations of the core [`ModelStore`](downwatch_core::ModelStore)
//! trait — an in-memory slot and a file-backed store with a read-through
//! cache — plus the sink the upload endpoint writes the raw CSV to.
//!
//! All file writes here go through the same discipline: write a sibling
//! temp file, then rename over the target. Readers never observe a torn
//! file, and an overwrite is all-or-nothing.

pub mod dataset;
pub mod file;
pub mod memory;

pub use dataset::DatasetSink;
pub use file::FileModelStore;
pub use memory::InMemoryModelStore;

use downwatch_core::{DownwatchError, Result};
use std::path::{Path, PathBuf};

/// Atomically replace `path` with `bytes` via a sibling temp file.
pub(crate) async fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = temp_sibling(path);
    tokio::fs::write(&temp, bytes).await.map_err(|e| {
        DownwatchError::Storage(format!("Failed to write {}: {}", temp.display(), e))
    })?;
    tokio::fs::rename(&temp, path).await.map_err(|e| {
        DownwatchError::Storage(format!(
            "Failed to move {} into place: {}",
            temp.display(),
            e
        ))
    })?;
    Ok(())
}

/// Temp path in the same directory, so the rename stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_atomic_write_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");

        atomic_write(&path, b"first").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"first");

        atomic_write(&path, b"second").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        atomic_write(&path, b"payload").await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name());
        }
        assert_eq!(names, vec![std::ffi::OsString::from("data.bin")]);
    }
}
