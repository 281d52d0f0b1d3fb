mod book;
mod list;
mod prompts;
mod requests;
mod schema;
mod video;

pub use book::{BookRecommendation, SimilarityType};
pub use list::{BookList, Listable, RecommendationList, VideoList};
pub use prompts::PromptSuggestions;
pub use requests::{BookLookupRequest, CustomPromptRequest, VideoLookupRequest};
pub use schema::{output_schema, Fields, SchemaViolation, Shape, Variants};
pub use video::{MediaType, VideoRecommendation};
