use axum::{
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{
    auth::require_api_key,
    rate_limit::enforce_rate_limit,
    request_id::{make_span_with_request_id, request_id_middleware},
};

use super::handlers;
use super::AppState;

pub const SIMILAR_BOOKS_ROUTE: &str = "/books/recommendations/similar";
pub const CUSTOM_BOOKS_ROUTE: &str = "/books/recommendations/custom";
pub const BOOK_PROMPTS_ROUTE: &str = "/books/prompts/:book_title";
pub const VIDEOS_ROUTE: &str = "/videos/recommendations";

/// Creates the main API router with all routes
///
/// Recommendation routes run auth first, then the rate limiter (route layers
/// added later wrap earlier ones). `/health` bypasses both.
pub fn create_router(state: AppState) -> Router {
    let recommendations = Router::new()
        // Books
        .route(SIMILAR_BOOKS_ROUTE, post(handlers::similar_books))
        .route(CUSTOM_BOOKS_ROUTE, post(handlers::custom_books))
        .route(BOOK_PROMPTS_ROUTE, post(handlers::book_prompts))
        // Videos
        .route(VIDEOS_ROUTE, post(handlers::similar_videos))
        .route_layer(from_fn_with_state(state.clone(), enforce_rate_limit))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(recommendations)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(state.cors_origins.as_deref()))
        .with_state(state)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let Some(origins) = origins else {
        return layer.allow_origin(Any);
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}
