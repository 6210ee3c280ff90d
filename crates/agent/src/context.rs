//! Conversation assembly for an analysis run

use adsentry_data::{recent_window, PerformanceRow};
use adsentry_provider::{Message, ToolCallDef};
use chrono::Local;
use std::collections::BTreeSet;

/// Days of history embedded in the task message and used for verification
pub const ANALYSIS_WINDOW_DAYS: usize = 7;

/// Builds the system instruction and user task turn for one run
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn system_prompt() -> String {
        let today = Local::now().format("%Y-%m-%d (%A)");
        format!(
            r#"You are an expert AI marketing analyst working for a global digital agency.
Today is {today}.

You receive aggregated daily performance data for ad platforms. Each row is
one platform's aggregated daily performance. Key metrics:
  - roas    : Return on Ad Spend (revenue / spend) -- PRIMARY health metric
  - ctr     : Click-through rate (%)
  - cpc     : Cost per click ($)
  - cpa     : Cost per acquisition ($)
  - spend   : Total ad spend ($)
  - revenue : Total attributed revenue ($)
  - conversions: Total conversions

SEVERITY RULES (based on ROAS):
  high   = ROAS below 0.8   -> campaign is losing money, act immediately
  medium = ROAS 0.8 to 1.2  -> poor performance, needs intervention
  low    = ROAS 1.2 to 1.5  -> below target, monitor closely

YOUR STEPS:
  1. SCAN all platforms for ROAS below 1.5
  2. VERIFY trends using get_campaign_trend before alerting
     (confirm it's a multi-day trend, not a single bad day)
  3. FIRE alerts using create_alert for confirmed underperformers
     - Be specific: name the platform, exact ROAS value, date range
     - Give actionable recommendations (budget reallocation, bid strategy,
       creative refresh, audience targeting)
     - Mention which platform is outperforming and suggest shifting budget
  4. GENERATE a daily report covering all platforms using generate_report
     - Include platform comparison
     - Note which platform has best/worst ROAS
     - Highlight spend efficiency (revenue per dollar spent)

RULES:
  - Always reference specific metric values (e.g. "ROAS of 0.92 over 7 days")
  - Compare platforms against each other in recommendations
  - If a platform has high CPA, flag it even if ROAS seems acceptable
  - Generate the report even if all platforms are healthy
  - Do not create duplicate alerts for the same platform in one run"#
        )
    }

    /// Embed the most recent window per platform into the task turn
    pub fn task_message(rows: &[PerformanceRow]) -> String {
        let recent = recent_window(rows, ANALYSIS_WINDOW_DAYS);
        let platforms: BTreeSet<&str> = recent.iter().map(|r| r.platform.as_str()).collect();
        let data = serde_json::to_string_pretty(&recent).unwrap_or_else(|_| "[]".to_string());

        format!(
            "Analyse the following ad platform performance data.\n\
             This covers the last {} days aggregated per platform.\n\
             \n\
             Platforms being analysed: {:?}\n\
             Total data rows: {}\n\
             \n\
             Data:\n\
             {}\n\
             \n\
             Follow your analysis steps:\n\
             1. Check each platform's ROAS and secondary metrics (CTR, CPC, CPA)\n\
             2. Use get_campaign_trend to verify suspicious platforms\n\
             3. Create alerts for underperforming platforms\n\
             4. Generate the daily cross-platform performance report",
            ANALYSIS_WINDOW_DAYS,
            platforms,
            recent.len(),
            data,
        )
    }

    /// Initial conversation: system instruction + task turn
    pub fn initial_messages(rows: &[PerformanceRow]) -> Vec<Message> {
        vec![
            Message::system(Self::system_prompt()),
            Message::user(Self::task_message(rows)),
        ]
    }

    /// Append an assistant turn, with its tool-call requests if any
    pub fn add_assistant_message(
        messages: &mut Vec<Message>,
        content: Option<&str>,
        tool_calls: Option<Vec<ToolCallDef>>,
    ) {
        let mut msg = Message::assistant(content.unwrap_or(""));
        if let Some(calls) = tool_calls {
            msg.tool_calls = Some(calls);
        }
        messages.push(msg);
    }

    /// Append a tool-result turn tagged with the call's correlation id
    pub fn add_tool_result(
        messages: &mut Vec<Message>,
        tool_call_id: &str,
        name: &str,
        result: &str,
    ) {
        messages.push(Message::tool(tool_call_id, name, result));
    }
}
