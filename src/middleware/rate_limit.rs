use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::{api::AppState, error::AppError, middleware::auth::Identity};

/// Response header reporting how many requests remain in the current window
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Maximum requests a client may make to one route within a rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ceiling {
    pub limit: u32,
    pub window: Duration,
}

impl Ceiling {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }
}

/// Outcome of a single admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    route: String,
    client: IpAddr,
}

/// Rolling-window limiter keyed by (route, client address)
///
/// Each key keeps the timestamps of its admitted requests; a timestamp stops
/// counting exactly one window after it was recorded. Checking and recording
/// happen under the key's map-entry lock, so concurrent requests from the same
/// client cannot both take the last slot.
pub struct RateLimiter {
    default_ceiling: Ceiling,
    route_ceilings: HashMap<String, Ceiling>,
    windows: DashMap<WindowKey, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(default_ceiling: Ceiling) -> Self {
        Self {
            default_ceiling,
            route_ceilings: HashMap::new(),
            windows: DashMap::new(),
        }
    }

    /// Declares a ceiling for one route, overriding the default
    pub fn with_route(mut self, route: impl Into<String>, ceiling: Ceiling) -> Self {
        self.route_ceilings.insert(route.into(), ceiling);
        self
    }

    pub fn ceiling(&self, route: &str) -> Ceiling {
        self.route_ceilings
            .get(route)
            .copied()
            .unwrap_or(self.default_ceiling)
    }

    pub fn allow(&self, route: &str, client: IpAddr) -> RateDecision {
        self.allow_at(route, client, Instant::now())
    }

    /// Checks and records a request at an explicit instant
    pub fn allow_at(&self, route: &str, client: IpAddr, now: Instant) -> RateDecision {
        let ceiling = self.ceiling(route);
        let key = WindowKey {
            route: route.to_string(),
            client,
        };

        let mut entry = self.windows.entry(key).or_default();
        let log = entry.value_mut();
        prune(log, now, ceiling.window);

        if log.len() >= ceiling.limit as usize {
            let retry_after = log
                .front()
                .map(|oldest| (*oldest + ceiling.window).saturating_duration_since(now))
                .unwrap_or(ceiling.window);
            return RateDecision::Limited { retry_after };
        }

        log.push_back(now);
        RateDecision::Allowed {
            remaining: ceiling.limit - log.len() as u32,
        }
    }

    /// Requests currently counted against a key, without pruning
    pub fn recorded(&self, route: &str, client: IpAddr) -> usize {
        let key = WindowKey {
            route: route.to_string(),
            client,
        };
        self.windows.get(&key).map(|log| log.len()).unwrap_or(0)
    }

    /// Drops keys whose every timestamp has aged out
    pub fn sweep(&self, now: Instant) {
        self.windows.retain(|key, log| {
            prune(log, now, self.ceiling(&key.route).window);
            !log.is_empty()
        });
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Runs `sweep` on a fixed interval for the life of the process
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let before = self.tracked_keys();
                self.sweep(Instant::now());
                tracing::debug!(
                    before,
                    after = self.tracked_keys(),
                    "Swept idle rate limit windows"
                );
            }
        })
    }
}

fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = log.front() {
        if now.saturating_duration_since(*oldest) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

/// Client network address, or the unspecified address when the server was
/// not started with connect info (e.g. in-process test transports)
fn client_addr(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Rejects with 429 once the client exceeds the route's ceiling
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let client = client_addr(&request);

    match state.rate_limiter.allow(&route, client) {
        RateDecision::Allowed { remaining } => {
            let identity = request.extensions().get::<Identity>().copied();
            tracing::debug!(
                client = %client,
                route = %route,
                identity = ?identity,
                remaining,
                "Request admitted"
            );
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert(REMAINING_HEADER, HeaderValue::from(remaining));
            Ok(response)
        }
        RateDecision::Limited { retry_after } => {
            let ceiling = state.rate_limiter.ceiling(&route);
            tracing::warn!(
                client = %client,
                route = %route,
                retry_after_ms = retry_after.as_millis() as u64,
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited {
                limit: ceiling.limit,
                window_secs: ceiling.window.as_secs(),
                retry_after_secs: retry_after.as_secs_f64().ceil().max(1.0) as u64,
            })
        }
    }
}
