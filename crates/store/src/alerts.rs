//! Append-only alert store, persisted as a JSON array on disk

use adsentry_data::Alert;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::Result;

/// Alert collection backed by a single JSON file.
///
/// The agent only appends; read and clear belong to the management surface.
/// No cross-process locking: concurrent runs may interleave writes.
pub struct AlertStore {
    path: PathBuf,
}

impl AlertStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all persisted alerts. A missing or unparseable file reads as
    /// empty rather than failing.
    pub async fn read(&self) -> Vec<Alert> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(alerts) => alerts,
                Err(e) => {
                    warn!("Alert store at {:?} is corrupt, treating as empty: {}", self.path, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        }
    }

    /// Append one alert and persist the full collection
    pub async fn append(&self, alert: Alert) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut alerts = self.read().await;
        alerts.push(alert);

        let content = serde_json::to_string_pretty(&alerts)?;
        tokio::fs::write(&self.path, content).await?;
        debug!("Alert store now holds {} alerts", alerts.len());
        Ok(())
    }

    /// Remove all persisted alerts
    pub async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            tokio::fs::write(&self.path, "[]").await?;
        }
        Ok(())
    }
}
