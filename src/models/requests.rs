use serde::Serialize;
use serde_json::Value;

use super::schema::{Fields, SchemaViolation, Shape};
use super::MediaType;

// ============================================================================
// Inbound request bodies
// ============================================================================

/// Body of `POST /books/recommendations/similar`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookLookupRequest {
    pub book_title: String,
}

/// Body of `POST /books/recommendations/custom`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomPromptRequest {
    pub prompt: String,
}

/// Body of `POST /videos/recommendations`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VideoLookupRequest {
    pub title: String,
    pub media_type: MediaType,
}

impl Shape for BookLookupRequest {
    const NAME: &'static str = "book lookup request";

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self {
            book_title: f.non_blank("book_title")?,
        })
    }
}

impl Shape for CustomPromptRequest {
    const NAME: &'static str = "custom prompt request";

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self {
            prompt: f.non_blank("prompt")?,
        })
    }
}

impl Shape for VideoLookupRequest {
    const NAME: &'static str = "video lookup request";

    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let f = Fields::of(value, path)?;
        Ok(Self {
            title: f.non_blank("title")?,
            media_type: f.variant("media_type")?,
        })
    }
}

crate::deserialize_via_shape!(BookLookupRequest, CustomPromptRequest, VideoLookupRequest);
