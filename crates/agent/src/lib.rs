//! Analysis agent core
//!
//! Drives a bounded multi-turn exchange with a language-model responder that
//! can request a fixed set of tools (alert creation, trend lookup, report
//! generation), executes those requests, folds the results back into the
//! conversation, and distills everything into one `DecisionRecord`.

use thiserror::Error;

pub mod context;
pub mod dispatcher;
pub mod loop_agent;
pub mod registry;
pub mod trend;

pub use context::ContextBuilder;
pub use dispatcher::{ToolDispatcher, ToolResult};
pub use loop_agent::{AnalystAgent, DecisionRecord, ToolCallEntry, MAX_ITERATIONS};
pub use registry::{tool_definitions, ToolName};
pub use trend::{TrendMetric, TrendReport};

/// Agent errors. A responder failure is the only fatal condition; everything
/// else folds back into the conversation as a failed `ToolResult`.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("responder error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
