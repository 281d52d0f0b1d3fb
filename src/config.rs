use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key_gemini: String,

    /// Exa search API key; search grounding is disabled when absent
    #[serde(default)]
    pub api_key_exa: Option<String>,

    /// Shared secret expected in the `X-API-Key` header
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Serve every route without the `X-API-Key` check (public demo mode)
    #[serde(default)]
    pub auth_disabled: bool,

    /// Gemini model id
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Exa API base URL
    #[serde(default = "default_exa_api_url")]
    pub exa_api_url: String,

    /// Number of results returned per web search
    #[serde(default = "default_search_results")]
    pub search_results: u32,

    /// Requests allowed per client per route within the window
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,

    /// Rolling window length in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Allowed CORS origins; any origin when unset
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_exa_api_url() -> String {
    "https://api.exa.ai".to_string()
}

fn default_search_results() -> u32 {
    12
}

fn default_rate_limit_requests() -> u32 {
    20
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects combinations the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let has_secret = self
            .api_secret
            .as_deref()
            .is_some_and(|s| !s.is_empty());
        if !self.auth_disabled && !has_secret {
            anyhow::bail!("API_SECRET must be set unless AUTH_DISABLED=true");
        }
        if self.rate_limit_requests == 0 || self.rate_limit_window_secs == 0 {
            anyhow::bail!("RATE_LIMIT_REQUESTS and RATE_LIMIT_WINDOW_SECS must be positive");
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
