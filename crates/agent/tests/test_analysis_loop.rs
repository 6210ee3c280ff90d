//! Orchestration loop tests against a scripted responder

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

use adsentry_agent::{AnalystAgent, ToolDispatcher, MAX_ITERATIONS};
use adsentry_data::{Health, PerformanceRow, Severity};
use adsentry_provider::{
    ChatParams, ChatResponse, Provider, ProviderError, ToolCall,
};
use adsentry_store::{AirtableSink, AlertStore, ReportStore};

/// Responder that replays a fixed script of turns. When the script is
/// exhausted it keeps requesting a trend lookup, which exercises the
/// iteration ceiling.
struct ScriptedProvider {
    script: Mutex<VecDeque<ChatResponse>>,
    fail: bool,
}

impl ScriptedProvider {
    fn new(turns: Vec<ChatResponse>) -> Self {
        Self {
            script: Mutex::new(turns.into()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, _params: ChatParams) -> Result<ChatResponse, ProviderError> {
        if self.fail {
            return Err(ProviderError::Api("connection reset".to_string()));
        }
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| {
            ChatResponse::tool_calls(vec![ToolCall {
                id: "call_loop".to_string(),
                name: "get_campaign_trend".to_string(),
                arguments: json!({"platform_name": "Google Ads", "metric": "roas"}),
            }])
        }))
    }

    fn default_model(&self) -> String {
        "scripted".to_string()
    }

    fn is_configured(&self) -> bool {
        true
    }
}

fn rows(platform: &str, roas_by_day: &[f64]) -> Vec<PerformanceRow> {
    roas_by_day
        .iter()
        .enumerate()
        .map(|(i, &roas)| PerformanceRow {
            platform: platform.to_string(),
            date: format!("2025-06-{:02}", i + 1),
            impressions: 10_000,
            clicks: 400,
            spend: 500.0,
            conversions: 40,
            revenue: 500.0 * roas,
            roas,
            ctr: 4.0,
            cpc: 1.25,
            cpa: 12.5,
        })
        .collect()
}

fn agent(
    dir: &std::path::Path,
    provider: ScriptedProvider,
) -> AnalystAgent<ScriptedProvider> {
    let dispatcher = ToolDispatcher::new(
        AlertStore::new(dir.join("alerts.json")),
        ReportStore::new(dir.join("latest_report.md")),
        AirtableSink::disabled(),
    );
    AnalystAgent::new(provider, dispatcher)
}

fn tool_call(id: &str, name: &str, args: serde_json::Value) -> ChatResponse {
    ChatResponse::tool_calls(vec![ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: args,
    }])
}

#[tokio::test]
async fn test_no_tool_calls_completes_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![ChatResponse::text("All platforms are healthy.")]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Google Ads", &[2.0; 7])).await.unwrap();

    assert_eq!(record.status, "success");
    assert_eq!(record.summary, "All platforms are healthy.");
    assert!(record.alerts.is_empty());
    assert_eq!(record.alerts_count, 0);
    assert_eq!(record.overall_health, Health::Healthy);
    assert!(record.tool_calls_log.is_empty());
    assert_eq!(record.report, "");
}

#[tokio::test]
async fn test_end_to_end_underperforming_platform() {
    // 7 days of Google Ads at ROAS 0.6: verify trend, fire a high alert,
    // generate the report, then stop.
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        tool_call(
            "call_1",
            "get_campaign_trend",
            json!({"platform_name": "Google Ads", "days": 7, "metric": "roas"}),
        ),
        tool_call(
            "call_2",
            "create_alert",
            json!({
                "platform": "Google Ads",
                "issue": "ROAS 0.6 over 7 days",
                "severity": "high",
                "recommendation": "reallocate budget"
            }),
        ),
        tool_call(
            "call_3",
            "generate_report",
            json!({
                "summary_text": "Google Ads is losing money at ROAS 0.6.",
                "platforms_analysed": ["Google Ads"],
                "total_alerts_fired": 1,
                "overall_health": "critical"
            }),
        ),
        ChatResponse::text("Fired one critical alert for Google Ads."),
    ]);
    let agent = agent(dir.path(), provider);

    let data = rows("Google Ads", &[0.6; 7]);
    let record = agent.run(&data).await.unwrap();

    assert_eq!(record.status, "success");
    assert_eq!(record.alerts.len(), 1);
    assert_eq!(record.alerts[0].severity, Severity::High);
    assert_eq!(record.overall_health, Health::Critical);
    assert!(!record.report.is_empty());
    assert!(record.report.contains("losing money"));
    assert_eq!(record.tool_calls_log.len(), 3);
    assert_eq!(record.summary, "Fired one critical alert for Google Ads.");
    assert_eq!(record.rows_analysed, 7);

    // Tool calls logged in order with their iteration numbers
    assert_eq!(record.tool_calls_log[0].tool, "get_campaign_trend");
    assert_eq!(record.tool_calls_log[0].iteration, 1);
    assert_eq!(record.tool_calls_log[1].tool, "create_alert");
    assert_eq!(record.tool_calls_log[1].iteration, 2);
    assert_eq!(record.tool_calls_log[2].tool, "generate_report");
    assert_eq!(record.tool_calls_log[2].iteration, 3);

    // The alert also landed in the persistent store
    let persisted = AlertStore::new(dir.path().join("alerts.json")).read().await;
    assert_eq!(persisted.len(), 1);
}

#[tokio::test]
async fn test_iteration_ceiling_yields_partial_result() {
    // A responder that never stops asking for tools is cut off at the
    // ceiling with whatever accumulated, not an error.
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![tool_call(
        "call_a",
        "create_alert",
        json!({
            "platform": "Meta Ads",
            "issue": "ROAS 1.0 over 7 days",
            "severity": "medium",
            "recommendation": "tighten audience targeting"
        }),
    )]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Meta Ads", &[1.0; 7])).await.unwrap();

    assert_eq!(record.status, "success");
    assert_eq!(record.tool_calls_log.len(), MAX_ITERATIONS as usize);
    assert_eq!(
        record.tool_calls_log.last().unwrap().iteration,
        MAX_ITERATIONS
    );
    // Ended mid tool-call burst: no terminal free text
    assert_eq!(record.summary, "");
    assert_eq!(record.alerts_count, 1);
    assert_eq!(record.overall_health, Health::Warning);
}

#[tokio::test]
async fn test_second_report_overwrites_first() {
    let dir = tempfile::tempdir().unwrap();
    let report_args = |text: &str| {
        json!({
            "summary_text": text,
            "platforms_analysed": ["Google Ads"],
            "total_alerts_fired": 0,
            "overall_health": "healthy"
        })
    };
    let provider = ScriptedProvider::new(vec![
        tool_call("call_1", "generate_report", report_args("first draft")),
        tool_call("call_2", "generate_report", report_args("final version")),
        ChatResponse::text("done"),
    ]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Google Ads", &[2.0; 7])).await.unwrap();

    assert!(record.report.contains("final version"));
    assert!(!record.report.contains("first draft"));
    assert_eq!(record.tool_calls_log.len(), 2);
}

#[tokio::test]
async fn test_health_never_downgrades_within_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let alert_args = |platform: &str, severity: &str| {
        json!({
            "platform": platform,
            "issue": "below target",
            "severity": severity,
            "recommendation": "review"
        })
    };
    let provider = ScriptedProvider::new(vec![
        tool_call("call_1", "create_alert", alert_args("Google Ads", "high")),
        tool_call("call_2", "create_alert", alert_args("TikTok Ads", "low")),
        ChatResponse::text("done"),
    ]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Google Ads", &[0.6; 7])).await.unwrap();

    assert_eq!(record.alerts.len(), 2);
    // The later low alert cannot pull critical back down
    assert_eq!(record.overall_health, Health::Critical);
}

#[tokio::test]
async fn test_invalid_arguments_fold_back_without_failing_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        tool_call(
            "call_1",
            "create_alert",
            json!({
                "platform": "Google Ads",
                "issue": "bad",
                "severity": "catastrophic",
                "recommendation": "fix"
            }),
        ),
        ChatResponse::text("Corrected: no valid alert fired."),
    ]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Google Ads", &[0.6; 7])).await.unwrap();

    // The rejected call is logged but creates nothing and raises nothing
    assert_eq!(record.tool_calls_log.len(), 1);
    assert!(record.alerts.is_empty());
    assert_eq!(record.overall_health, Health::Healthy);
    assert_eq!(record.summary, "Corrected: no valid alert fired.");
}

#[tokio::test]
async fn test_unknown_tool_name_folds_back_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        tool_call("call_1", "delete_alert", json!({})),
        ChatResponse::text("understood"),
    ]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Google Ads", &[2.0; 7])).await.unwrap();

    assert_eq!(record.status, "success");
    assert_eq!(record.tool_calls_log.len(), 1);
    assert_eq!(record.tool_calls_log[0].tool, "delete_alert");
    assert!(record.alerts.is_empty());
}

#[tokio::test]
async fn test_multiple_calls_in_one_turn_run_sequentially() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        ChatResponse::tool_calls(vec![
            ToolCall {
                id: "call_1".to_string(),
                name: "create_alert".to_string(),
                arguments: json!({
                    "platform": "Meta Ads",
                    "issue": "ROAS 1.1",
                    "severity": "medium",
                    "recommendation": "review bids"
                }),
            },
            ToolCall {
                id: "call_2".to_string(),
                name: "generate_report".to_string(),
                arguments: json!({
                    "summary_text": "One medium alert fired.",
                    "platforms_analysed": ["Meta Ads"],
                    "total_alerts_fired": 1,
                    "overall_health": "warning"
                }),
            },
        ]),
        ChatResponse::text("done"),
    ]);
    let agent = agent(dir.path(), provider);

    let record = agent.run(&rows("Meta Ads", &[1.1; 7])).await.unwrap();

    // Same iteration, emitted order preserved
    assert_eq!(record.tool_calls_log.len(), 2);
    assert_eq!(record.tool_calls_log[0].tool, "create_alert");
    assert_eq!(record.tool_calls_log[1].tool, "generate_report");
    assert_eq!(record.tool_calls_log[0].iteration, 1);
    assert_eq!(record.tool_calls_log[1].iteration, 1);
    assert_eq!(record.overall_health, Health::Warning);
    assert!(record.report.contains("One medium alert fired."));
}

#[tokio::test]
async fn test_responder_failure_is_fatal_for_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let agent = agent(dir.path(), ScriptedProvider::failing());

    let result = agent.run(&rows("Google Ads", &[2.0; 7])).await;
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("connection reset"));
}
