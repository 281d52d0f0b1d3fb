use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        BookList, BookLookupRequest, CustomPromptRequest, PromptSuggestions, SchemaViolation,
        VideoList, VideoLookupRequest,
    },
};

use super::{AppState, ValidatedJson};

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Books similar to a given title
pub async fn similar_books(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ValidatedJson(request): ValidatedJson<BookLookupRequest>,
) -> AppResult<Json<BookList>> {
    tracing::info!(
        request_id = %request_id,
        book_title = %request.book_title,
        "Processing similar books request"
    );

    let books = state.agent.similar_books(&request.book_title).await?;

    tracing::info!(request_id = %request_id, count = books.len(), "Similar books ready");
    Ok(Json(books))
}

/// Books matching a free-form instruction, passed to the agent verbatim
pub async fn custom_books(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ValidatedJson(request): ValidatedJson<CustomPromptRequest>,
) -> AppResult<Json<BookList>> {
    tracing::info!(
        request_id = %request_id,
        prompt_len = request.prompt.len(),
        "Processing custom books request"
    );

    let books = state.agent.custom_books(&request.prompt).await?;

    tracing::info!(request_id = %request_id, count = books.len(), "Custom books ready");
    Ok(Json(books))
}

/// Follow-up prompts for exploring books related to a title
pub async fn book_prompts(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(book_title): Path<String>,
) -> AppResult<Json<PromptSuggestions>> {
    if book_title.trim().is_empty() {
        return Err(AppError::InvalidRequest(SchemaViolation::new(
            "book_title",
            "non-empty string",
        )));
    }

    tracing::info!(
        request_id = %request_id,
        book_title = %book_title,
        "Processing book prompts request"
    );

    let prompts = state.agent.book_prompts(&book_title).await?;
    Ok(Json(prompts))
}

/// Movies or TV shows similar to a given title
pub async fn similar_videos(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ValidatedJson(request): ValidatedJson<VideoLookupRequest>,
) -> AppResult<Json<VideoList>> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        media_type = %request.media_type,
        "Processing video recommendations request"
    );

    let videos = state
        .agent
        .similar_videos(&request.title, request.media_type)
        .await?;

    tracing::info!(request_id = %request_id, count = videos.len(), "Video recommendations ready");
    Ok(Json(videos))
}
