//! Orchestration loop - the core of the analysis run
//!
//! Each turn sends the full conversation to the responder, executes any
//! requested tool calls sequentially, folds the results back in, and stops
//! when the responder has nothing left to ask for or the iteration budget
//! runs out.

use serde_json::Value;
use tracing::{debug, info};

use adsentry_data::{Alert, Health, PerformanceRow};
use adsentry_provider::{ChatParams, Provider, ToolCallDef, ToolChoice};

use crate::context::ContextBuilder;
use crate::dispatcher::{ToolDispatcher, ToolResult};
use crate::registry::{tool_definitions, ToolName};

/// Hard ceiling on responder turns per run. A fixed safety bound against
/// runaway tool-call loops; deliberately not configurable at runtime.
pub const MAX_ITERATIONS: u32 = 10;

/// One logged tool call
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolCallEntry {
    pub tool: String,
    pub args: Value,
    pub iteration: u32,
}

/// Everything a run decided, assembled once at loop exit
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecisionRecord {
    pub status: String,
    pub alerts: Vec<Alert>,
    pub report: String,
    pub summary: String,
    pub overall_health: Health,
    pub tool_calls_log: Vec<ToolCallEntry>,
    pub rows_analysed: usize,
    pub alerts_count: usize,
}

/// The analysis agent: a responder plus the tool dispatcher
pub struct AnalystAgent<P: Provider> {
    provider: P,
    dispatcher: ToolDispatcher,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl<P: Provider> AnalystAgent<P> {
    pub fn new(provider: P, dispatcher: ToolDispatcher) -> Self {
        let model = provider.default_model();
        Self {
            provider,
            dispatcher,
            model,
            max_tokens: 4096,
            temperature: 0.2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Run one analysis over already-aggregated platform-day rows.
    ///
    /// The conversation is owned by this invocation and dropped at the end;
    /// only the DecisionRecord survives. A responder failure is fatal for
    /// the run; everything else (bad arguments, missing platforms, audit
    /// sink trouble) is folded back into the conversation instead.
    pub async fn run(&self, rows: &[PerformanceRow]) -> crate::Result<DecisionRecord> {
        let mut messages = ContextBuilder::initial_messages(rows);

        let mut alerts_created: Vec<Alert> = Vec::new();
        let mut report_body: Option<String> = None;
        let mut tool_calls_log: Vec<ToolCallEntry> = Vec::new();
        let mut overall_health = Health::Healthy;
        let mut summary = String::new();
        let mut iteration: u32 = 0;

        while iteration < MAX_ITERATIONS {
            iteration += 1;
            debug!("Analysis iteration {}", iteration);

            let params = ChatParams {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: tool_definitions(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: ToolChoice::Auto,
            };

            let response = self
                .provider
                .chat(params)
                .await
                .map_err(|e| crate::AgentError::Provider(e.to_string()))?;

            if !response.has_tool_calls() {
                // Terminal turn: the free text becomes the run's summary
                summary = response.content.clone().unwrap_or_default();
                ContextBuilder::add_assistant_message(
                    &mut messages,
                    response.content.as_deref(),
                    None,
                );
                break;
            }

            let tool_call_defs: Vec<ToolCallDef> = response
                .tool_calls
                .iter()
                .map(|tc| ToolCallDef::new(&tc.id, &tc.name, tc.arguments.clone()))
                .collect();
            ContextBuilder::add_assistant_message(
                &mut messages,
                response.content.as_deref(),
                Some(tool_call_defs),
            );

            // Sequential on purpose: a later call in the same turn may depend
            // on state an earlier one just wrote (e.g. the report should
            // reflect alerts already created).
            for tool_call in &response.tool_calls {
                tool_calls_log.push(ToolCallEntry {
                    tool: tool_call.name.clone(),
                    args: tool_call.arguments.clone(),
                    iteration,
                });

                let result = match ToolName::parse(&tool_call.name) {
                    Some(tool) => {
                        self.dispatcher
                            .execute(tool, &tool_call.arguments, rows)
                            .await
                    }
                    None => ToolResult::error(format!("unknown tool: {}", tool_call.name)),
                };

                match &result {
                    ToolResult::AlertCreated { alert, .. } => {
                        overall_health.raise_for(alert.severity);
                        alerts_created.push(alert.clone());
                    }
                    ToolResult::ReportGenerated { report, .. } => {
                        // Last report wins if the model calls this twice
                        report_body = Some(report.clone());
                    }
                    _ => {}
                }

                ContextBuilder::add_tool_result(
                    &mut messages,
                    &tool_call.id,
                    &tool_call.name,
                    &result.to_value().to_string(),
                );
            }
        }

        info!(
            "Run complete: {} alerts, health {}, {} tool calls over {} iterations",
            alerts_created.len(),
            overall_health,
            tool_calls_log.len(),
            iteration,
        );

        let alerts_count = alerts_created.len();
        Ok(DecisionRecord {
            status: "success".to_string(),
            alerts: alerts_created,
            report: report_body.unwrap_or_default(),
            summary,
            overall_health,
            tool_calls_log,
            rows_analysed: rows.len(),
            alerts_count,
        })
    }
}
