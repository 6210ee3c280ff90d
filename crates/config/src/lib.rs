//! Configuration management for adsentry
//!
//! Loads and saves settings from a JSON file under `~/.adsentry/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{alerts_path, config_path, data_dir, report_path};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Language-model provider credentials
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    /// OpenAI-compatible base URL; defaults to Groq when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Airtable audit-log credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirtableConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default = "default_airtable_table")]
    pub table: String,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            table: default_airtable_table(),
        }
    }
}

fn default_airtable_table() -> String {
    "Insights".to_string()
}

/// Default analysis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDefaults {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.2
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
    #[serde(default)]
    pub analysis: AnalysisDefaults,
}

impl Config {
    /// Load from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from a specific location
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("Loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        !self.provider.api_key.is_empty()
    }

    pub fn default_model(&self) -> String {
        self.analysis.model.clone()
    }

    pub fn airtable_configured(&self) -> bool {
        !self.airtable.api_key.is_empty() && !self.airtable.base_id.is_empty()
    }
}

/// Initialize config file and data directory
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("Config already exists at {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("Config written to {:?}", config_path);
    }

    let data = data_dir().join("data");
    tokio::fs::create_dir_all(&data).await?;
    info!("Data directory ready at {:?}", data);

    Config::load().await
}
