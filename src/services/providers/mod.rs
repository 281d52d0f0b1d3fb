/// External model and search providers
///
/// The agent gateway only talks to these traits, so the hosted model and the
/// search engine can be swapped (or scripted in tests) without touching routes.
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub mod exa;
pub mod gemini;

/// Everything the model needs for one agent run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Persona, instructions, date and target output shape
    pub system: String,
    /// The synthesized user instruction
    pub prompt: String,
    /// Whether the model may call the web search tool
    pub search: bool,
}

/// Final text produced by the model after any tool calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// How many rounds of tool calls preceded the final answer
    pub tool_rounds: u32,
}

/// Trait for hosted generative models
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionModel: Send + Sync {
    /// Runs the request to completion, resolving tool calls along the way
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// One web search result handed back to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Trait for live web search used to ground recommendations
#[async_trait::async_trait]
pub trait SearchTool: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>>;

    fn name(&self) -> &'static str;
}
