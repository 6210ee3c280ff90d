//! Single-slot report store
//!
//! One global latest report; every write overwrites the previous document.
//! Concurrent runs race and the last writer wins.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::Result;

pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the latest report, replacing any prior one
    pub async fn write(&self, markdown: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, markdown).await?;
        debug!("Report written to {:?}", self.path);
        Ok(())
    }

    /// Read the latest report, if any has ever been written
    pub async fn read(&self) -> Option<String> {
        tokio::fs::read_to_string(&self.path).await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_before_write_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().join("latest_report.md"));
        assert!(store.read().await.is_none());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().join("latest_report.md"));

        store.write("# First").await.unwrap();
        store.write("# Second").await.unwrap();

        assert_eq!(store.read().await.as_deref(), Some("# Second"));
    }
}
