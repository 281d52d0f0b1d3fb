use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    middleware::{
        auth::AuthGuard,
        rate_limit::{Ceiling, RateLimiter},
    },
    services::{
        providers::{exa::ExaSearch, gemini::GeminiModel, CompletionModel},
        AgentGateway,
    },
};

/// Shared application state
///
/// Built once at startup and cloned into every handler; only the rate
/// limiter's counters change after that.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthGuard>,
    pub rate_limiter: Arc<RateLimiter>,
    pub agent: Arc<AgentGateway>,
    /// Allowed CORS origins; any origin when `None`
    pub cors_origins: Option<Vec<String>>,
}

impl AppState {
    pub fn new(auth: AuthGuard, rate_limiter: RateLimiter, agent: AgentGateway) -> Self {
        Self {
            auth: Arc::new(auth),
            rate_limiter: Arc::new(rate_limiter),
            agent: Arc::new(agent),
            cors_origins: None,
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Wires the Gemini model, optional Exa search, auth and rate limits from config
    pub fn from_config(config: &Config) -> Self {
        let http_client = HttpClient::new();

        let mut gemini = GeminiModel::new(
            http_client.clone(),
            config.api_key_gemini.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        );

        match &config.api_key_exa {
            Some(key) if !key.is_empty() => {
                let exa = ExaSearch::new(
                    http_client,
                    key.clone(),
                    config.exa_api_url.clone(),
                    config.search_results,
                );
                gemini = gemini.with_search(Arc::new(exa));
            }
            _ => tracing::warn!("API_KEY_EXA not set, search grounding disabled"),
        }

        let model: Arc<dyn CompletionModel> = Arc::new(gemini);
        let ceiling = Ceiling::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        );

        let state = Self::new(
            AuthGuard::from_config(config),
            RateLimiter::new(ceiling),
            AgentGateway::new(model),
        );

        match &config.cors_origins {
            Some(origins) => state.with_cors_origins(origins.clone()),
            None => state,
        }
    }
}
