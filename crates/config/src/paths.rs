//! Path utilities

use std::path::PathBuf;

/// Base data directory (~/.adsentry)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .expect("failed to locate home directory")
        .join(".adsentry")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Persisted alert collection
pub fn alerts_path() -> PathBuf {
    data_dir().join("data").join("alerts.json")
}

/// Latest report slot
pub fn report_path() -> PathBuf {
    data_dir().join("data").join("latest_report.md")
}
