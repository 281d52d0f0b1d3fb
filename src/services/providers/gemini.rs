/// Google Gemini provider (`models/{model}:generateContent`)
///
/// When the request allows search, `search_web` is declared as a function the
/// model may call. Each call is answered from the configured `SearchTool` and
/// the conversation is replayed until the model produces text, bounded by
/// `MAX_TOOL_ROUNDS`.
use std::sync::Arc;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    services::providers::{Completion, CompletionModel, CompletionRequest, SearchTool},
};

pub const SEARCH_TOOL_NAME: &str = "search_web";
const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_TOOL_ROUNDS: u32 = 4;
const TEMPERATURE: f64 = 0.4;

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: Option<String>,
    status: Option<String>,
}

/// Pulls the human-readable message out of a Gemini error body
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<GeminiErrorEnvelope>(body) {
        Ok(GeminiErrorEnvelope {
            error: Some(GeminiError { message, status }),
        }) => format!(
            "{} (status={})",
            message.unwrap_or_else(|| "unknown error".to_string()),
            status.unwrap_or_else(|| "unknown".to_string())
        ),
        _ => body.to_string(),
    }
}

fn search_declaration() -> Value {
    json!({
        "name": SEARCH_TOOL_NAME,
        "description": "Search the web for up-to-date information about books, movies and TV shows.",
        "parameters": {
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The search query" }
            },
            "required": ["query"]
        }
    })
}

#[derive(Clone)]
pub struct GeminiModel {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    search: Option<Arc<dyn SearchTool>>,
}

impl GeminiModel {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            model,
            search: None,
        }
    }

    /// Enables the `search_web` tool for requests that allow search
    pub fn with_search(mut self, search: Arc<dyn SearchTool>) -> Self {
        self.search = Some(search);
        self
    }

    fn endpoint(&self) -> AppResult<reqwest::Url> {
        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        let endpoint = format!(
            "{}/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            model_path
        );
        reqwest::Url::parse(&endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid Gemini endpoint {endpoint}: {e}")))
    }

    fn request_body(&self, request: &CompletionRequest, contents: &[Value], tools: bool) -> Value {
        let mut body = json!({
            "system_instruction": { "parts": [{ "text": request.system }] },
            "contents": contents,
            "generationConfig": { "temperature": TEMPERATURE }
        });

        if tools {
            body["tools"] = json!([{ "functionDeclarations": [search_declaration()] }]);
        } else {
            // JSON mode cannot be combined with function calling
            body["generationConfig"]["responseMimeType"] = json!("application/json");
        }

        body
    }

    async fn generate(&self, body: &Value) -> AppResult<GeminiCandidate> {
        let response = self
            .http_client
            .post(self.endpoint()?)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Gemini API returned status {}: {}",
                status,
                api_error_message(&payload)
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&payload)
            .map_err(|e| AppError::Upstream(format!("Failed to parse Gemini response: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream("Gemini returned no candidates".to_string()))
    }

    /// Answers one function call; model mistakes are reported back to the model,
    /// search failures abort the run
    async fn run_tool(&self, search: &dyn SearchTool, call: &GeminiFunctionCall) -> AppResult<Value> {
        if call.name != SEARCH_TOOL_NAME {
            return Ok(json!({ "error": format!("unknown tool `{}`", call.name) }));
        }

        let query = call
            .args
            .as_ref()
            .and_then(|args| args.get("query"))
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty());

        let Some(query) = query else {
            return Ok(json!({ "error": "missing `query` argument" }));
        };

        let hits = search.search(query).await?;
        Ok(json!({ "results": hits }))
    }
}

#[async_trait::async_trait]
impl CompletionModel for GeminiModel {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        let search = self.search.as_deref().filter(|_| request.search);
        let mut contents = vec![json!({
            "role": "user",
            "parts": [{ "text": request.prompt }]
        })];

        for round in 0..=MAX_TOOL_ROUNDS {
            let body = self.request_body(request, &contents, search.is_some());
            let candidate = self.generate(&body).await?;
            let finish_reason = candidate.finish_reason.unwrap_or_default();
            let parts = candidate.content.unwrap_or_default().parts;

            let calls: Vec<GeminiFunctionCall> =
                parts.iter().filter_map(|p| p.function_call.clone()).collect();

            if calls.is_empty() {
                let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
                if text.trim().is_empty() {
                    return Err(AppError::Upstream(format!(
                        "Gemini returned an empty reply (finish reason: {})",
                        if finish_reason.is_empty() { "unknown" } else { finish_reason.as_str() }
                    )));
                }
                return Ok(Completion {
                    text,
                    tool_rounds: round,
                });
            }

            let Some(search) = search else {
                return Err(AppError::Upstream(
                    "Gemini requested a tool call but no tools were offered".to_string(),
                ));
            };

            if round == MAX_TOOL_ROUNDS {
                break;
            }

            tracing::debug!(
                round = round + 1,
                calls = calls.len(),
                tool = search.name(),
                "Gemini requested tool calls"
            );

            let call_parts: Vec<Value> = calls
                .iter()
                .map(|c| json!({ "functionCall": { "name": c.name, "args": c.args.clone().unwrap_or_else(|| json!({})) } }))
                .collect();
            contents.push(json!({ "role": "model", "parts": call_parts }));

            let mut response_parts = Vec::with_capacity(calls.len());
            for call in &calls {
                let result = self.run_tool(search, call).await?;
                response_parts.push(json!({
                    "functionResponse": { "name": call.name, "response": result }
                }));
            }
            contents.push(json!({ "role": "user", "parts": response_parts }));
        }

        Err(AppError::Upstream(format!(
            "Gemini was still calling tools after {MAX_TOOL_ROUNDS} rounds"
        )))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
