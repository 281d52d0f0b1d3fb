use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    api::AppState,
    config::Config,
    error::{AppError, AppResult},
};

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Who a request was admitted as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Presented the shared secret
    SharedKey,
    /// Admitted because auth is switched off
    Anonymous,
}

#[derive(Debug, Clone)]
enum Mode {
    Enforced(String),
    Disabled,
}

/// Validates the `X-API-Key` header against a single process-wide secret
#[derive(Debug, Clone)]
pub struct AuthGuard {
    mode: Mode,
}

impl AuthGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            mode: Mode::Enforced(secret.into()),
        }
    }

    /// Guard that admits every request (public demo mode)
    pub fn disabled() -> Self {
        Self {
            mode: Mode::Disabled,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        if config.auth_disabled {
            return Self::disabled();
        }
        Self::new(config.api_secret.clone().unwrap_or_default())
    }

    pub fn is_enforced(&self) -> bool {
        matches!(self.mode, Mode::Enforced(_))
    }

    /// Exact comparison of the supplied key with the configured secret
    pub fn authenticate(&self, supplied: Option<&str>) -> AppResult<Identity> {
        match &self.mode {
            Mode::Disabled => Ok(Identity::Anonymous),
            Mode::Enforced(secret) => match supplied {
                Some(key) if !key.is_empty() && key == secret => Ok(Identity::SharedKey),
                _ => Err(AppError::Forbidden),
            },
        }
    }
}

/// Rejects requests without the shared secret before any other processing
///
/// Installed outside the rate limiter, so rejected traffic never consumes budget.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let identity = state.auth.authenticate(supplied).inspect_err(|_| {
        tracing::warn!(
            path = %request.uri().path(),
            key_present = supplied.is_some(),
            "Rejected request with invalid API key"
        );
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
