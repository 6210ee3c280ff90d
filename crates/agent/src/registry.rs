//! Fixed tool set advertised to the responder
//!
//! The set is closed and known at compile time, so tools are routed through
//! an enum rather than string-keyed dispatch. The JSON parameter schemas
//! declare `severity` and `overall_health` as closed value sets; values
//! outside them are rejected at the dispatcher boundary.

use adsentry_provider::Tool;
use serde_json::json;
use std::fmt;

/// The three callable tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    CreateAlert,
    GenerateReport,
    GetCampaignTrend,
}

impl ToolName {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create_alert" => Some(Self::CreateAlert),
            "generate_report" => Some(Self::GenerateReport),
            "get_campaign_trend" => Some(Self::GetCampaignTrend),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAlert => "create_alert",
            Self::GenerateReport => "generate_report",
            Self::GetCampaignTrend => "get_campaign_trend",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool declarations in the provider wire format. Read-only after start.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            ToolName::CreateAlert.as_str(),
            "Fire an alert when a platform is underperforming. \
             Use when ROAS is below 1.5, CTR drops significantly, \
             or conversions decline over multiple days. \
             Severity: high = ROAS below 0.8, medium = 0.8-1.2, low = 1.2-1.5.",
            json!({
                "type": "object",
                "properties": {
                    "platform": {
                        "type": "string",
                        "description": "Platform name (e.g. Google Ads)"
                    },
                    "issue": {
                        "type": "string",
                        "description": "Specific issue with metric values and timeframe"
                    },
                    "severity": {
                        "type": "string",
                        "enum": ["low", "medium", "high"]
                    },
                    "recommendation": {
                        "type": "string",
                        "description": "Specific actionable recommendation"
                    }
                },
                "required": ["platform", "issue", "severity", "recommendation"]
            }),
        ),
        Tool::new(
            ToolName::GenerateReport.as_str(),
            "Generate a full markdown daily performance report. \
             Call this AFTER all alerts have been created.",
            json!({
                "type": "object",
                "properties": {
                    "summary_text": {
                        "type": "string",
                        "description": "Full markdown report content"
                    },
                    "platforms_analysed": {
                        "type": "array",
                        "items": {"type": "string"}
                    },
                    "total_alerts_fired": {"type": "integer"},
                    "overall_health": {
                        "type": "string",
                        "enum": ["healthy", "warning", "critical"]
                    }
                },
                "required": [
                    "summary_text",
                    "platforms_analysed",
                    "total_alerts_fired",
                    "overall_health"
                ]
            }),
        ),
        Tool::new(
            ToolName::GetCampaignTrend.as_str(),
            "Get last N days of performance data for a specific platform. \
             Call this BEFORE creating an alert to verify it's a real trend.",
            json!({
                "type": "object",
                "properties": {
                    "platform_name": {"type": "string"},
                    "days": {"type": "integer", "default": 7},
                    "metric": {
                        "type": "string",
                        "enum": ["roas", "ctr", "conversions", "spend", "revenue", "all"],
                        "default": "all"
                    }
                },
                "required": ["platform_name"]
            }),
        ),
    ]
}
