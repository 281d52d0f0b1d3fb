/// Exa web search provider
///
/// `POST /search` with the API key in `x-api-key`; page text is trimmed so a
/// dozen hits fit comfortably in the model's context.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::{SearchHit, SearchTool},
};

const MAX_TEXT_CHARS: u32 = 1000;

#[derive(Debug, Deserialize)]
struct ExaSearchResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<ExaResult> for SearchHit {
    fn from(result: ExaResult) -> Self {
        SearchHit {
            url: result.url,
            title: result.title,
            published_date: result.published_date,
            text: result.text,
        }
    }
}

#[derive(Clone)]
pub struct ExaSearch {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    num_results: u32,
}

impl ExaSearch {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, num_results: u32) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            num_results,
        }
    }
}

#[async_trait::async_trait]
impl SearchTool for ExaSearch {
    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>> {
        let url = format!("{}/search", self.api_url.trim_end_matches('/'));
        let body = json!({
            "query": query,
            "numResults": self.num_results,
            "contents": { "text": { "maxCharacters": MAX_TEXT_CHARS } }
        });

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Exa search returned status {}: {}",
                status, body
            )));
        }

        let parsed: ExaSearchResponse = response.json().await?;
        let hits: Vec<SearchHit> = parsed.results.into_iter().map(SearchHit::from).collect();

        tracing::info!(
            query = %query,
            results = hits.len(),
            provider = "exa",
            "Web search completed"
        );

        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "exa"
    }
}
