//! Bounded look-back trend analysis for a single platform
//!
//! A deliberately simple two-point heuristic, not a regression: percent
//! change between the first and last value of the window, classified with a
//! +/-5% dead band. Keeps the responder's verification step cheap and
//! deterministic.

use adsentry_data::{PerformanceRow, TrendDirection};
use serde::Serialize;
use serde_json::{json, Value};

/// Metric selector for a trend lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    Roas,
    Ctr,
    Conversions,
    Spend,
    Revenue,
    All,
}

impl TrendMetric {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "roas" => Some(Self::Roas),
            "ctr" => Some(Self::Ctr),
            "conversions" => Some(Self::Conversions),
            "spend" => Some(Self::Spend),
            "revenue" => Some(Self::Revenue),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roas => "roas",
            Self::Ctr => "ctr",
            Self::Conversions => "conversions",
            Self::Spend => "spend",
            Self::Revenue => "revenue",
            Self::All => "all",
        }
    }

    /// Extract this metric's value from a row. `All` has no single value.
    fn value(&self, row: &PerformanceRow) -> Option<f64> {
        match self {
            Self::Roas => Some(row.roas),
            Self::Ctr => Some(row.ctr),
            Self::Conversions => Some(row.conversions as f64),
            Self::Spend => Some(row.spend),
            Self::Revenue => Some(row.revenue),
            Self::All => None,
        }
    }
}

/// Result of a trend lookup
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub platform: String,
    pub days_retrieved: usize,
    pub metric: String,
    pub trend: Vec<Value>,
    pub trend_direction: TrendDirection,
    pub change_percent: Option<f64>,
}

/// Compute the trend window for one platform.
///
/// Returns `None` when no rows match the platform. Otherwise the window is
/// the last `days` rows sorted by date ascending; fewer rows than `days` is
/// not an error, and `days: 0` is clamped to 1 so a matched platform always
/// yields at least its latest row. Direction is classified only when a
/// specific metric was requested and at least two rows exist.
pub fn analyze(
    rows: &[PerformanceRow],
    platform: &str,
    days: usize,
    metric: TrendMetric,
) -> Option<TrendReport> {
    let mut matching: Vec<&PerformanceRow> =
        rows.iter().filter(|r| r.platform == platform).collect();

    if matching.is_empty() {
        return None;
    }

    matching.sort_by(|a, b| a.date.cmp(&b.date));
    let skip = matching.len().saturating_sub(days.max(1));
    let window = &matching[skip..];

    let trend: Vec<Value> = window
        .iter()
        .map(|row| match metric.value(row) {
            Some(value) => {
                let mut point = serde_json::Map::new();
                point.insert("date".to_string(), json!(row.date));
                point.insert(metric.as_str().to_string(), json!(value));
                Value::Object(point)
            }
            None => serde_json::to_value(row).unwrap_or(Value::Null),
        })
        .collect();

    let (direction, change_percent) = if window.len() >= 2 && metric != TrendMetric::All {
        let first = metric.value(window[0]).unwrap_or(0.0);
        let last = metric.value(window[window.len() - 1]).unwrap_or(0.0);
        let change = percent_change(first, last);
        (classify(change), Some(change))
    } else {
        (TrendDirection::Unknown, None)
    };

    Some(TrendReport {
        platform: platform.to_string(),
        days_retrieved: trend.len(),
        metric: metric.as_str().to_string(),
        trend,
        trend_direction: direction,
        change_percent,
    })
}

/// Two-point percent change, rounded to one decimal. A zero or negative
/// first value yields 0 rather than an error or infinity.
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first > 0.0 {
        ((last - first) / first * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Declining below -5%, improving above +5%, stable in between
pub fn classify(change_percent: f64) -> TrendDirection {
    if change_percent < -5.0 {
        TrendDirection::Declining
    } else if change_percent > 5.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Stable
    }
}
