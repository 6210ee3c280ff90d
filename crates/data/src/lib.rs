//! Shared domain types for ad platform performance monitoring
//!
//! One `PerformanceRow` is a single platform-day observation, aggregated
//! upstream. Rows are immutable once loaded; the agent trusts its input is
//! already one row per platform-day.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Data loading errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read rows file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rows file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// One platform-day performance observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRow {
    /// Platform name (e.g. "Google Ads")
    #[serde(alias = "campaign")]
    pub platform: String,
    /// Calendar day, string-sortable `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub revenue: f64,
    /// Return on ad spend (revenue / spend) -- primary health metric
    #[serde(default)]
    pub roas: f64,
    /// Click-through rate (%)
    #[serde(default)]
    pub ctr: f64,
    /// Cost per click ($)
    #[serde(default)]
    pub cpc: f64,
    /// Cost per acquisition ($)
    #[serde(default)]
    pub cpa: f64,
}

/// Alert urgency tier, driven by ROAS thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-level aggregate health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Warning,
    Critical,
}

impl Health {
    /// Escalate for a fired alert. Never downgrades: high forces critical,
    /// medium raises to warning unless already critical, and the first low
    /// alert still moves healthy to warning.
    pub fn raise_for(&mut self, severity: Severity) {
        match severity {
            Severity::High => *self = Self::Critical,
            Severity::Medium => {
                if *self != Self::Critical {
                    *self = Self::Warning;
                }
            }
            Severity::Low => {
                if *self == Self::Healthy {
                    *self = Self::Warning;
                }
            }
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "healthy" => Some(Self::Healthy),
            "warning" => Some(Self::Warning),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-point trend classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Declining,
    Improving,
    Stable,
    Unknown,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declining => "declining",
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert fired for an underperforming platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub platform: String,
    pub issue: String,
    pub severity: Severity,
    pub recommendation: String,
    pub timestamp: DateTime<Local>,
    pub status: String,
}

impl Alert {
    /// Build a fresh alert with the current timestamp and status "new"
    pub fn new(
        platform: impl Into<String>,
        issue: impl Into<String>,
        severity: Severity,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            issue: issue.into(),
            severity,
            recommendation: recommendation.into(),
            timestamp: Local::now(),
            status: "new".to_string(),
        }
    }
}

/// Keep the most recent `days` rows per platform.
///
/// Rows are grouped by platform and sorted by date ascending within each
/// group; order across platforms is unspecified.
pub fn recent_window(rows: &[PerformanceRow], days: usize) -> Vec<PerformanceRow> {
    let mut by_platform: HashMap<&str, Vec<&PerformanceRow>> = HashMap::new();
    for row in rows {
        by_platform.entry(&row.platform).or_default().push(row);
    }

    let mut recent = Vec::new();
    for (_, mut platform_rows) in by_platform {
        platform_rows.sort_by(|a, b| a.date.cmp(&b.date));
        let skip = platform_rows.len().saturating_sub(days);
        recent.extend(platform_rows.into_iter().skip(skip).cloned());
    }

    recent
}

/// Load a JSON array of rows from disk
pub async fn load_rows(path: impl AsRef<Path>) -> Result<Vec<PerformanceRow>> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let rows: Vec<PerformanceRow> = serde_json::from_str(&content)?;
    debug!("Loaded {} rows from {:?}", rows.len(), path.as_ref());
    Ok(rows)
}
