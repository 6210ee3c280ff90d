//! Tool execution
//!
//! All side effects live here, isolated from the loop: alert persistence
//! (plus the best-effort Airtable mirror), report persistence, and trend
//! computation. Invalid arguments never raise; they come back as a failed
//! `ToolResult` that gets folded into the conversation so the responder can
//! self-correct on its next turn.

use adsentry_data::{Alert, Health, PerformanceRow, Severity};
use adsentry_store::{AirtableSink, AlertStore, ReportStore};
use chrono::Local;
use serde_json::{json, Value};
use tracing::debug;

use crate::registry::ToolName;
use crate::trend::{self, TrendMetric, TrendReport};

/// Outcome of one tool call, folded back into the conversation verbatim
#[derive(Debug, Clone)]
pub enum ToolResult {
    AlertCreated {
        message: String,
        alert: Alert,
    },
    ReportGenerated {
        message: String,
        report: String,
        overall_health: Health,
        alerts_fired: u64,
    },
    Trend(TrendReport),
    Error {
        message: String,
        /// Present for trend lookups that matched no rows
        empty_trend: bool,
    },
}

impl ToolResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            empty_trend: false,
        }
    }

    pub fn success(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    /// Serialize for the responder's next turn
    pub fn to_value(&self) -> Value {
        match self {
            Self::AlertCreated { message, alert } => json!({
                "success": true,
                "message": message,
                "alert": alert,
            }),
            Self::ReportGenerated {
                message,
                report,
                overall_health,
                alerts_fired,
            } => json!({
                "success": true,
                "message": message,
                "report": report,
                "overall_health": overall_health,
                "alerts_fired": alerts_fired,
            }),
            Self::Trend(report) => json!({
                "success": true,
                "platform": report.platform,
                "days_retrieved": report.days_retrieved,
                "metric": report.metric,
                "trend": report.trend,
                "trend_direction": report.trend_direction,
                "change_percent": report.change_percent,
            }),
            Self::Error {
                message,
                empty_trend,
            } => {
                let mut value = json!({
                    "success": false,
                    "message": message,
                });
                if *empty_trend {
                    value["trend"] = json!([]);
                }
                value
            }
        }
    }
}

/// Executes tool calls against the persistence collaborators
pub struct ToolDispatcher {
    alerts: AlertStore,
    reports: ReportStore,
    audit: AirtableSink,
}

impl ToolDispatcher {
    pub fn new(alerts: AlertStore, reports: ReportStore, audit: AirtableSink) -> Self {
        Self {
            alerts,
            reports,
            audit,
        }
    }

    /// Execute one tool call. `context_rows` is the full input row set; the
    /// trend tool does its own platform filtering and windowing.
    pub async fn execute(
        &self,
        tool: ToolName,
        args: &Value,
        context_rows: &[PerformanceRow],
    ) -> ToolResult {
        debug!("Executing tool: {}", tool);
        match tool {
            ToolName::CreateAlert => self.create_alert(args).await,
            ToolName::GenerateReport => self.generate_report(args).await,
            ToolName::GetCampaignTrend => self.get_campaign_trend(args, context_rows),
        }
    }

    async fn create_alert(&self, args: &Value) -> ToolResult {
        let platform = match required_str(args, "platform") {
            Ok(s) => s,
            Err(e) => return ToolResult::error(e),
        };
        let issue = match required_str(args, "issue") {
            Ok(s) => s,
            Err(e) => return ToolResult::error(e),
        };
        let recommendation = match required_str(args, "recommendation") {
            Ok(s) => s,
            Err(e) => return ToolResult::error(e),
        };
        let severity = match required_str(args, "severity") {
            Ok(s) => match Severity::parse(s) {
                Some(severity) => severity,
                None => {
                    return ToolResult::error(format!(
                        "invalid severity '{}': must be one of low, medium, high",
                        s
                    ))
                }
            },
            Err(e) => return ToolResult::error(e),
        };

        let alert = Alert::new(platform, issue, severity, recommendation);

        if let Err(e) = self.alerts.append(alert.clone()).await {
            return ToolResult::error(format!("failed to persist alert: {}", e));
        }

        // Best-effort mirror; local persistence already succeeded
        let _ = self.audit.log_alert(&alert).await;

        ToolResult::AlertCreated {
            message: format!("Alert created for {} (severity: {})", platform, severity),
            alert,
        }
    }

    async fn generate_report(&self, args: &Value) -> ToolResult {
        let overall_health = match required_str(args, "overall_health") {
            Ok(s) => match Health::parse(s) {
                Some(health) => health,
                None => {
                    return ToolResult::error(format!(
                        "invalid overall_health '{}': must be one of healthy, warning, critical",
                        s
                    ))
                }
            },
            Err(e) => return ToolResult::error(e),
        };

        let summary_text = args["summary_text"].as_str().unwrap_or("");
        let alerts_fired = args["total_alerts_fired"].as_u64().unwrap_or(0);
        let platforms: Vec<&str> = args["platforms_analysed"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        let report = format!(
            "# Daily Campaign Performance Report\n\
             **Generated:** {}\n\
             **Overall Health:** {}\n\
             **Alerts Fired:** {}\n\
             **Platforms Analysed:** {}\n\
             \n\
             ---\n\
             \n\
             {}\n",
            Local::now().format("%Y-%m-%d %H:%M"),
            overall_health.as_str().to_uppercase(),
            alerts_fired,
            platforms.join(", "),
            summary_text,
        );

        if let Err(e) = self.reports.write(&report).await {
            return ToolResult::error(format!("failed to persist report: {}", e));
        }

        ToolResult::ReportGenerated {
            message: "Report generated and saved.".to_string(),
            report,
            overall_health,
            alerts_fired,
        }
    }

    fn get_campaign_trend(&self, args: &Value, context_rows: &[PerformanceRow]) -> ToolResult {
        let platform = match required_str(args, "platform_name") {
            Ok(s) => s,
            Err(e) => return ToolResult::error(e),
        };
        let days = args["days"].as_u64().unwrap_or(7) as usize;
        let metric_name = args["metric"].as_str().unwrap_or("all");
        let metric = match TrendMetric::parse(metric_name) {
            Some(metric) => metric,
            None => return ToolResult::error(format!("unknown metric '{}'", metric_name)),
        };

        match trend::analyze(context_rows, platform, days, metric) {
            Some(report) => ToolResult::Trend(report),
            None => ToolResult::Error {
                message: format!("No data found for: {}", platform),
                empty_trend: true,
            },
        }
    }
}

fn required_str<'a>(args: &'a Value, field: &str) -> std::result::Result<&'a str, String> {
    match args[field].as_str() {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(format!("missing required field '{}'", field)),
    }
}
