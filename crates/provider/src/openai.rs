//! OpenAI-compatible chat-completions transport
//!
//! Default endpoint is Groq's OpenAI-compatible API; any compatible base URL
//! works (OpenAI, OpenRouter, vLLM).

use crate::*;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, trace};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl OpenAiProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_base: Option<String>,
        default_model: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.unwrap_or_else(|| GROQ_API_BASE.to_string()),
            default_model: default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn build_request(&self, params: &ChatParams) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = params
            .messages
            .iter()
            .map(|m| {
                let mut obj = json!({ "role": &m.role });
                if let Some(content) = &m.content {
                    obj["content"] = json!(content);
                }
                if let Some(tool_calls) = &m.tool_calls {
                    obj["tool_calls"] = json!(tool_calls);
                }
                if let Some(tool_call_id) = &m.tool_call_id {
                    obj["tool_call_id"] = json!(tool_call_id);
                }
                if let Some(name) = &m.name {
                    obj["name"] = json!(name);
                }
                obj
            })
            .collect();

        let mut body = json!({
            "model": params.model,
            "messages": messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });

        if !params.tools.is_empty() {
            body["tools"] = json!(params.tools);
            body["tool_choice"] = match &params.tool_choice {
                ToolChoice::Auto => json!("auto"),
                ToolChoice::Required(name) => {
                    json!({"type": "function", "function": {"name": name}})
                }
                ToolChoice::None => json!("none"),
            };
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatResponse> {
        let choice = json["choices"]
            .get(0)
            .ok_or(ProviderError::InvalidResponse)?;
        let message = &choice["message"];
        let content = message["content"].as_str().map(|s| s.to_string());
        let finish_reason = choice["finish_reason"]
            .as_str()
            .unwrap_or("stop")
            .to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let function = &call["function"];
                // Arguments arrive as a JSON string on the wire
                let args = function["arguments"]
                    .as_str()
                    .and_then(|s| serde_json::from_str(s).ok())
                    .unwrap_or_else(|| function["arguments"].clone());

                tool_calls.push(ToolCall {
                    id: call["id"].as_str().unwrap_or("").to_string(),
                    name: function["name"].as_str().unwrap_or("").to_string(),
                    arguments: args,
                });
            }
        }

        Ok(ChatResponse {
            content,
            tool_calls,
            finish_reason,
        })
    }
}

#[async_trait::async_trait]
impl Provider for OpenAiProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NoApiKey);
        }

        trace!("chat completion request to {}", self.api_base);

        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request(&params);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let json: serde_json::Value = response.json().await?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }
            let error = json["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(ProviderError::Api(error));
        }

        debug!(
            "completion: {} tool calls",
            json["choices"][0]["message"]["tool_calls"]
                .as_array()
                .map(|v| v.len())
                .unwrap_or(0)
        );

        self.parse_response(json)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
