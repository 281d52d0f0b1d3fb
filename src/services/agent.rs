use std::sync::Arc;

use chrono::Utc;
use schemars::JsonSchema;

use crate::{
    error::{AppError, AppResult},
    models::{output_schema, BookList, MediaType, PromptSuggestions, Shape, VideoList},
    services::{
        output::extract_json,
        profiles::{AgentProfile, RecommendationKind},
        providers::{CompletionModel, CompletionRequest},
    },
};

/// A natural-language instruction for the agent, built from the caller's subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    SimilarBooks { title: String },
    CustomBooks { prompt: String },
    BookPrompts { title: String },
    SimilarVideos { title: String, media_type: MediaType },
}

impl Instruction {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            Instruction::SimilarBooks { .. } | Instruction::CustomBooks { .. } => {
                RecommendationKind::Book
            }
            Instruction::BookPrompts { .. } => RecommendationKind::Prompt,
            Instruction::SimilarVideos { .. } => RecommendationKind::Video,
        }
    }

    /// The text sent as the user turn; subjects are substituted verbatim
    pub fn render(&self) -> String {
        match self {
            Instruction::SimilarBooks { title } => {
                format!("I really enjoyed {title}, can you suggest similar books?")
            }
            Instruction::CustomBooks { prompt } => prompt.clone(),
            Instruction::BookPrompts { title } => format!("Book: {title}"),
            Instruction::SimilarVideos { title, media_type } => {
                format!("Search for {media_type} similar to {title}")
            }
        }
    }
}

/// Sends instructions to the hosted model and validates what comes back
///
/// One gateway serves every `RecommendationKind`; the kind selects the
/// persona and whether search is offered, the requested shape `T` selects the
/// output contract. Nothing is retried: model failures and malformed output
/// go straight back to the caller.
pub struct AgentGateway {
    model: Arc<dyn CompletionModel>,
}

impl AgentGateway {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub async fn recommend<T: Shape + JsonSchema>(&self, instruction: &Instruction) -> AppResult<T> {
        let kind = instruction.kind();
        let profile = AgentProfile::for_kind(kind);
        let schema = output_schema::<T>()
            .map_err(|e| AppError::Internal(format!("Failed to build {} schema: {e}", T::NAME)))?;
        let request = CompletionRequest {
            system: profile.system_text(Utc::now().date_naive(), &schema),
            prompt: instruction.render(),
            search: profile.search,
        };

        let completion = self.model.complete(&request).await.inspect_err(|e| {
            tracing::error!(
                kind = %kind,
                provider = self.model.name(),
                error = %e,
                "Agent call failed"
            );
        })?;

        let value = extract_json(&completion.text)?;
        let output = T::from_value(&value).map_err(|violation| {
            tracing::warn!(
                kind = %kind,
                shape = T::NAME,
                field = %violation.field,
                "Agent output failed validation"
            );
            AppError::MalformedOutput(violation)
        })?;

        tracing::info!(
            kind = %kind,
            agent = profile.name,
            provider = self.model.name(),
            shape = T::NAME,
            tool_rounds = completion.tool_rounds,
            "Agent call completed"
        );

        Ok(output)
    }

    pub async fn similar_books(&self, title: &str) -> AppResult<BookList> {
        self.recommend(&Instruction::SimilarBooks {
            title: title.to_string(),
        })
        .await
    }

    pub async fn custom_books(&self, prompt: &str) -> AppResult<BookList> {
        self.recommend(&Instruction::CustomBooks {
            prompt: prompt.to_string(),
        })
        .await
    }

    pub async fn book_prompts(&self, title: &str) -> AppResult<PromptSuggestions> {
        self.recommend(&Instruction::BookPrompts {
            title: title.to_string(),
        })
        .await
    }

    pub async fn similar_videos(&self, title: &str, media_type: MediaType) -> AppResult<VideoList> {
        self.recommend(&Instruction::SimilarVideos {
            title: title.to_string(),
            media_type,
        })
        .await
    }
}
